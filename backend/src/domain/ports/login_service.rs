//! Driving port for exchanging credentials for an API token.
//!
//! Inbound adapters call this port without knowing how accounts or tokens are
//! stored, which keeps handler tests free of persistence wiring.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, LoginCredentials};

/// Domain use-case port for token issuance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the credentials and return the account's token, creating it on
    /// first use.
    async fn obtain_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;
}
