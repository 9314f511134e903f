//! Test helpers for inbound HTTP components.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Account, AccountId, AccountParts, DisplayName, EmailAddress, PasswordHash,
};

/// Join date used by fixture accounts.
pub fn fixture_joined() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Build an active ordinary account without going through a repository.
///
/// The password hash is unusable; tests that check passwords go through the
/// accounts service instead.
pub fn fixture_account(email: &str, name: &str) -> Account {
    Account::from_parts(AccountParts {
        id: AccountId::random(),
        email: EmailAddress::parse(email).expect("valid fixture email"),
        name: DisplayName::new(name).expect("valid fixture name"),
        password: PasswordHash::unusable(),
        is_active: true,
        is_staff: false,
        is_superuser: false,
        date_joined: fixture_joined(),
    })
    .expect("valid fixture account")
}
