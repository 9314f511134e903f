//! Port abstraction for API token storage.
use async_trait::async_trait;

use crate::domain::{AccountId, AuthToken};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum TokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Storage for the single token each account may hold.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store `candidate` for the account unless it already has a token.
    ///
    /// Returns whichever token is stored once the call completes, so two
    /// concurrent callers observe the same key.
    async fn get_or_insert(
        &self,
        account_id: &AccountId,
        candidate: &AuthToken,
    ) -> Result<AuthToken, TokenPersistenceError>;

    /// Resolve a token key to the owning account.
    async fn find_account_id(
        &self,
        token: &AuthToken,
    ) -> Result<Option<AccountId>, TokenPersistenceError>;
}
