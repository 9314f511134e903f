//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Account, AccountId, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "an account with email {email} already exists",
    }
}

/// Durable storage for [`Account`] entities.
///
/// Implementations must enforce email uniqueness and report collisions as
/// [`AccountPersistenceError::DuplicateEmail`] without writing anything.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account.
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError>;

    /// Overwrite every mutable field of an existing account.
    ///
    /// Returns `false` when no account with that id exists.
    async fn update(&self, account: &Account) -> Result<bool, AccountPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError>;
}
