//! Tests for the account manager.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{AccountPersistenceError, MockAccountRepository};

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn joined_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock(joined_at()))
}

fn manager(repo: MockAccountRepository, clock: Arc<dyn Clock>) -> AccountManager<MockAccountRepository> {
    AccountManager::new(Arc::new(repo), clock)
}

fn password(raw: &str) -> Password {
    Password::new(raw).expect("non-empty password")
}

#[rstest]
#[tokio::test]
async fn create_user_normalises_email_domain(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert()
        .withf(|account: &Account| account.email().as_ref() == "test@firozsoft.com")
        .times(1)
        .return_once(|_| Ok(()));

    let account = manager(repo, clock)
        .create_user(NewAccount::with_email("test@FIROZSOFT.COM").password(password("test123")))
        .await
        .expect("account created");

    assert_eq!(account.email().as_ref(), "test@firozsoft.com");
    assert_eq!(account.date_joined(), joined_at());
    assert!(account.is_active());
    assert!(!account.is_staff());
}

#[rstest]
#[tokio::test]
async fn create_user_stores_hash_not_plaintext(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(1).return_once(|_| Ok(()));

    let account = manager(repo, clock)
        .create_user(NewAccount::with_email("a@example.com").password(password("testpass123")))
        .await
        .expect("account created");

    assert_ne!(account.password().as_str(), "testpass123");
    assert!(account.check_password(&password("testpass123")));
}

#[rstest]
#[case(None)]
#[case(Some(String::new()))]
#[case(Some("   ".to_owned()))]
#[tokio::test]
async fn create_user_without_email_writes_nothing(
    clock: Arc<dyn Clock>,
    #[case] email: Option<String>,
) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(0);

    let error = manager(repo, clock)
        .create_user(NewAccount {
            email,
            password: Some(password("test123")),
            ..NewAccount::default()
        })
        .await
        .expect_err("email is mandatory");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "email required");
}

#[rstest]
#[tokio::test]
async fn create_user_without_password_gets_unusable_hash(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(1).return_once(|_| Ok(()));

    let account = manager(repo, clock)
        .create_user(NewAccount::with_email("nopass@example.com").name("No Pass"))
        .await
        .expect("account created");

    assert!(!account.password().is_usable());
    assert_eq!(account.name().as_ref(), "No Pass");
}

#[rstest]
#[tokio::test]
async fn create_user_respects_inactive_flag(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(1).return_once(|_| Ok(()));

    let account = manager(repo, clock)
        .create_user(NewAccount {
            is_active: false,
            ..NewAccount::with_email("dormant@example.com")
        })
        .await
        .expect("account created");

    assert!(!account.is_active());
}

#[rstest]
#[tokio::test]
async fn create_user_reports_duplicate_email_as_invalid_request(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|account| Err(AccountPersistenceError::duplicate_email(account.email().as_ref())));

    let error = manager(repo, clock)
        .create_user(NewAccount::with_email("dup@example.com"))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({"field": "email", "code": "duplicate_email"}))
    );
}

#[rstest]
#[tokio::test]
async fn create_user_maps_connection_failure(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(AccountPersistenceError::connection("pool exhausted")));

    let error = manager(repo, clock)
        .create_user(NewAccount::with_email("a@example.com"))
        .await
        .expect_err("connection failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn create_superuser_sets_staff_and_superuser(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(1).return_once(|_| Ok(()));
    repo.expect_update()
        .withf(|account: &Account| account.is_staff() && account.is_superuser())
        .times(1)
        .return_once(|_| Ok(true));

    let account = manager(repo, clock)
        .create_superuser("admin@EXAMPLE.com", password("test123"))
        .await
        .expect("superuser created");

    assert!(account.is_superuser());
    assert!(account.is_staff());
    assert_eq!(account.email().as_ref(), "admin@example.com");
}

#[rstest]
#[tokio::test]
async fn create_superuser_names_the_created_account_when_promotion_misses(
    clock: Arc<dyn Clock>,
) {
    let inserted = Arc::new(std::sync::Mutex::new(None));
    let recorder = Arc::clone(&inserted);
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(1).return_once(move |account: &Account| {
        *recorder.lock().expect("recorder lock") = Some(*account.id());
        Ok(())
    });
    repo.expect_update().times(1).return_once(|_| Ok(false));

    let error = manager(repo, clock)
        .create_superuser("admin@example.com", password("test123"))
        .await
        .expect_err("promotion missed");

    let id = (*inserted.lock().expect("recorder lock")).expect("account inserted");
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.message().contains(&id.to_string()));
    assert!(error.message().contains("was created"));
}

#[rstest]
#[tokio::test]
async fn create_superuser_surfaces_promotion_outage(clock: Arc<dyn Clock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().times(1).return_once(|_| Ok(()));
    repo.expect_update()
        .times(1)
        .return_once(|_| Err(AccountPersistenceError::connection("reset")));

    let error = manager(repo, clock)
        .create_superuser("admin@example.com", password("test123"))
        .await
        .expect_err("promotion failed");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
fn hash_with_policy_rejects_short_passwords() {
    let error = hash_with_policy("pw").expect_err("too short");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({"field": "password", "code": "password_too_short"}))
    );
}
