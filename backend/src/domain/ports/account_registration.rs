//! Driving port for self-service account registration.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Account, Error};

/// Raw registration input. Validation happens behind the port.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: Zeroizing<String>,
    pub name: Option<String>,
}

/// Domain use-case port for creating accounts from client input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistration: Send + Sync {
    /// Validate the request and persist a new ordinary account.
    async fn register(&self, request: RegistrationRequest) -> Result<Account, Error>;
}
