//! Account entity.
//!
//! An account is keyed by a surrogate [`AccountId`] and by its normalised
//! email, which is unique. Accounts are never serialised directly; inbound
//! adapters project the public fields into their own response types.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{EmailAddress, Password, PasswordHash};

/// Maximum number of characters accepted in a display name.
pub const DISPLAY_NAME_MAX: usize = 255;

/// Validation errors raised while assembling an [`Account`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("a superuser must also be staff")]
    SuperuserWithoutStaff,
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Optional human readable name. Empty when the user gave none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and length-check a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(AccountValidationError::NameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Whether no name was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Raw field set used to rehydrate an [`Account`] from storage.
#[derive(Debug, Clone)]
pub struct AccountParts {
    pub id: AccountId,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password: PasswordHash,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

/// A registered user.
///
/// ## Invariants
/// - `email` was normalised exactly once, before the account was first
///   persisted.
/// - `is_superuser` implies `is_staff`.
/// - `password` is always a hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    email: EmailAddress,
    name: DisplayName,
    password: PasswordHash,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    date_joined: DateTime<Utc>,
}

impl Account {
    /// Start a new ordinary account with default flags.
    pub(crate) fn register(
        email: EmailAddress,
        name: DisplayName,
        password: PasswordHash,
        is_active: bool,
        date_joined: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::random(),
            email,
            name,
            password,
            is_active,
            is_staff: false,
            is_superuser: false,
            date_joined,
        }
    }

    /// Rebuild an account read back from storage.
    pub fn from_parts(parts: AccountParts) -> Result<Self, AccountValidationError> {
        let AccountParts {
            id,
            email,
            name,
            password,
            is_active,
            is_staff,
            is_superuser,
            date_joined,
        } = parts;
        if is_superuser && !is_staff {
            return Err(AccountValidationError::SuperuserWithoutStaff);
        }
        Ok(Self {
            id,
            email,
            name,
            password,
            is_active,
            is_staff,
            is_superuser,
            date_joined,
        })
    }

    #[must_use]
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    #[must_use]
    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    /// Whether `candidate` matches the stored hash.
    #[must_use]
    pub fn check_password(&self, candidate: &Password) -> bool {
        self.password.verify(candidate)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    #[must_use]
    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub(crate) fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
    }

    pub(crate) fn set_name(&mut self, name: DisplayName) {
        self.name = name;
    }

    pub(crate) fn set_password(&mut self, password: PasswordHash) {
        self.password = password;
    }

    /// Promote to superuser. Staff is granted alongside.
    pub(crate) fn grant_superuser(&mut self) {
        self.is_staff = true;
        self.is_superuser = true;
    }
}
