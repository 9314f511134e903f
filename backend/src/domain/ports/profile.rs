//! Driving ports for reading and editing the caller's own profile.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Account, AccountId, Error};

/// Partial profile edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<Zeroizing<String>>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}

/// Domain use-case port for profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Fetch the current state of the account.
    async fn fetch_profile(&self, account_id: &AccountId) -> Result<Account, Error>;
}

/// Domain use-case port for profile edits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply `update` and return the stored account.
    async fn update_profile(
        &self,
        account_id: &AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
    }

    #[rstest]
    fn update_with_any_field_is_not_empty() {
        let update = ProfileUpdate {
            name: Some("New".to_owned()),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
