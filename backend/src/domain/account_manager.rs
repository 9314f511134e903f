//! Factory that builds valid accounts and persists them.
//!
//! The manager is the only place new [`Account`] values are created. It
//! normalises the email once, hashes the password (or records an unusable
//! hash), and writes the result in a single repository call.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use super::account_errors::{
    account_validation_error, email_error, hash_error, map_account_persistence_error,
    password_error,
};
use super::ports::AccountRepository;
use super::{Account, DisplayName, EmailAddress, Error, Password, PasswordHash};

/// Input for [`AccountManager::create_user`].
///
/// Email and name are raw strings validated by the manager.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Option<String>,
    pub password: Option<Password>,
    pub name: Option<String>,
    pub is_active: bool,
}

impl NewAccount {
    /// Start an active account with only an email.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: None,
            name: None,
            is_active: true,
        }
    }

    /// Set the plaintext password to hash.
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for NewAccount {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            name: None,
            is_active: true,
        }
    }
}

/// Creates ordinary and privileged accounts.
///
/// # Examples
/// ```no_run
/// # use std::sync::Arc;
/// # use accounts::domain::{AccountManager, NewAccount, Password};
/// # use accounts::outbound::memory::InMemoryAccountStore;
/// # async fn demo() -> Result<(), accounts::domain::Error> {
/// let manager = AccountManager::new(
///     Arc::new(InMemoryAccountStore::default()),
///     Arc::new(mockable::DefaultClock),
/// );
/// let account = manager
///     .create_user(NewAccount::with_email("test@FIROZSOFT.COM"))
///     .await?;
/// assert_eq!(account.email().as_ref(), "test@firozsoft.com");
/// # Ok(())
/// # }
/// ```
pub struct AccountManager<R> {
    accounts: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for AccountManager<R> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R> AccountManager<R>
where
    R: AccountRepository,
{
    /// Build a manager over the account repository.
    pub fn new(accounts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { accounts, clock }
    }

    /// Validate, normalise and persist a new ordinary account.
    ///
    /// Fails with an `invalid_request` error when the email is absent or
    /// malformed, or already taken. Nothing is written on failure.
    pub async fn create_user(&self, new_account: NewAccount) -> Result<Account, Error> {
        let account = self.build(new_account)?;
        self.accounts
            .insert(&account)
            .await
            .map_err(map_account_persistence_error)?;
        info!(account_id = %account.id(), "account created");
        Ok(account)
    }

    /// Create an account and promote it to superuser and staff.
    pub async fn create_superuser(
        &self,
        email: impl Into<String>,
        password: Password,
    ) -> Result<Account, Error> {
        let mut account = self
            .create_user(NewAccount::with_email(email).password(password))
            .await?;
        account.grant_superuser();
        let promoted = match self.accounts.update(&account).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::internal(format!(
                "account {} was created but vanished before promotion",
                account.id()
            ))),
            Err(error) => Err(map_account_persistence_error(error)),
        };
        if let Err(error) = promoted {
            warn!(
                account_id = %account.id(),
                %error,
                "promotion failed; ordinary account left in place"
            );
            return Err(error);
        }
        info!(account_id = %account.id(), "account promoted to superuser");
        Ok(account)
    }

    fn build(&self, new_account: NewAccount) -> Result<Account, Error> {
        let NewAccount {
            email,
            password,
            name,
            is_active,
        } = new_account;
        let email = EmailAddress::parse(email.unwrap_or_default())
            .map_err(|err| email_error(&err))?;
        let name = DisplayName::new(name.unwrap_or_default())
            .map_err(|err| account_validation_error(&err))?;
        let password = match password {
            Some(password) => PasswordHash::hash(&password).map_err(|err| hash_error(&err))?,
            None => PasswordHash::unusable(),
        };
        Ok(Account::register(
            email,
            name,
            password,
            is_active,
            self.clock.utc(),
        ))
    }
}

/// Check `raw` against the password policy and hash it.
pub(crate) fn hash_with_policy(raw: &str) -> Result<PasswordHash, Error> {
    let password = Password::with_policy(raw).map_err(|err| password_error(&err))?;
    PasswordHash::hash(&password).map_err(|err| hash_error(&err))
}

#[cfg(test)]
mod tests;
