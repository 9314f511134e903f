//! Driving port resolving presented API tokens to accounts.

use async_trait::async_trait;

use crate::domain::{Account, AuthToken, Error};

/// Domain use-case port for request authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Return the active account owning `token`, or an unauthorised error.
    async fn authenticate(&self, token: &AuthToken) -> Result<Account, Error>;
}
