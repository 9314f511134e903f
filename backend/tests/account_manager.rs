//! Behaviour of the account factory against the in-memory store.

use std::sync::Arc;

use accounts::domain::ports::AccountRepository;
use accounts::domain::{
    Account, AccountManager, EmailAddress, Error, ErrorCode, NewAccount, Password,
};
use accounts::outbound::memory::InMemoryAccountStore;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

struct World {
    store: Arc<InMemoryAccountStore>,
    manager: AccountManager<InMemoryAccountStore>,
}

fn new_world() -> World {
    let store = Arc::new(InMemoryAccountStore::default());
    let manager = AccountManager::new(Arc::clone(&store), Arc::new(mockable::DefaultClock));
    World { store, manager }
}

#[fixture]
fn world() -> World {
    new_world()
}

fn password(raw: &str) -> Password {
    Password::new(raw).expect("non-empty password")
}

#[given("a new account request for an email with an upper-case domain")]
fn upper_case_domain_request() -> NewAccount {
    NewAccount::with_email("test@FIROZSOFT.COM").password(password("testpass123"))
}

#[when("the manager creates the user")]
fn the_manager_creates_the_user(request: NewAccount) -> Result<Account, Error> {
    let World { manager, .. } = new_world();
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(manager.create_user(request))
}

#[then("the stored email has a lower-case domain")]
fn stored_email_is_normalised(result: Result<Account, Error>) {
    let account = result.expect("account created");
    assert_eq!(account.email().as_ref(), "test@firozsoft.com");
}

#[rstest]
fn email_domain_is_normalised_on_creation() {
    let request = upper_case_domain_request();
    let result = the_manager_creates_the_user(request);
    stored_email_is_normalised(result);
}

#[rstest]
#[case(NewAccount::default())]
#[case(NewAccount::with_email(""))]
#[case(NewAccount::with_email("   "))]
#[tokio::test]
async fn missing_email_fails_without_writing(world: World, #[case] request: NewAccount) {
    let error = world
        .manager
        .create_user(request.password(password("testpass123")))
        .await
        .expect_err("email is required");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "email required");
    assert_eq!(world.store.account_count(), 0);
}

#[rstest]
#[tokio::test]
async fn superuser_is_staff_and_superuser(world: World) {
    let account = world
        .manager
        .create_superuser("test@firozsoft.com", password("test123"))
        .await
        .expect("superuser created");

    assert!(account.is_superuser());
    assert!(account.is_staff());

    let email = EmailAddress::parse("test@firozsoft.com").expect("valid email");
    let stored = world
        .store
        .find_by_email(&email)
        .await
        .expect("lookup succeeds")
        .expect("account stored");
    assert!(stored.is_superuser());
    assert!(stored.is_staff());
    assert_eq!(world.store.account_count(), 1);
}

#[rstest]
#[tokio::test]
async fn password_is_hashed_and_verifiable(world: World) {
    let account = world
        .manager
        .create_user(NewAccount::with_email("test@firozsoft.com").password(password("Testpass123")))
        .await
        .expect("account created");

    assert!(account.check_password(&password("Testpass123")));
    assert!(!account.check_password(&password("testpass123")));
    assert_ne!(account.password().as_str(), "Testpass123");
}

#[rstest]
#[tokio::test]
async fn account_without_password_cannot_log_in(world: World) {
    let account = world
        .manager
        .create_user(NewAccount::with_email("nopass@example.com"))
        .await
        .expect("account created");

    assert!(!account.password().is_usable());
    assert!(!account.check_password(&password("anything")));
}

#[rstest]
#[tokio::test]
async fn ordinary_accounts_are_active_and_unprivileged(world: World) {
    let account = world
        .manager
        .create_user(NewAccount::with_email("user@example.com").name("  Padded  "))
        .await
        .expect("account created");

    assert!(account.is_active());
    assert!(!account.is_staff());
    assert!(!account.is_superuser());
    assert_eq!(account.name().as_ref(), "Padded");
}
