//! Accounts service implementing the driving ports used by the HTTP layer.
//!
//! Registration is delegated to the [`AccountManager`]. Token issuance and
//! authentication combine the account and token repositories.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::account_errors::{
    account_validation_error, email_error, invalid_credentials, map_account_persistence_error,
    map_token_persistence_error, password_error,
};
use super::account_manager::hash_with_policy;
use super::ports::{
    AccountRegistration, AccountRepository, LoginService, ProfileCommand, ProfileQuery,
    ProfileUpdate, RegistrationRequest, TokenAuthenticator, TokenRepository,
};
use super::{
    Account, AccountId, AccountManager, AuthToken, DisplayName, EmailAddress, Error,
    LoginCredentials, NewAccount, Password, PasswordHash,
};

/// Message returned for every rejected token.
const INVALID_TOKEN: &str = "invalid token";

/// Service implementing every account driving port.
pub struct AccountsService<R, T> {
    accounts: Arc<R>,
    tokens: Arc<T>,
    manager: AccountManager<R>,
}

impl<R, T> Clone for AccountsService<R, T> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            tokens: Arc::clone(&self.tokens),
            manager: self.manager.clone(),
        }
    }
}

impl<R, T> AccountsService<R, T>
where
    R: AccountRepository,
    T: TokenRepository,
{
    /// Create a service over the account and token repositories.
    pub fn new(accounts: Arc<R>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        let manager = AccountManager::new(Arc::clone(&accounts), clock);
        Self {
            accounts,
            tokens,
            manager,
        }
    }

    /// The manager used for account creation.
    pub fn manager(&self) -> &AccountManager<R> {
        &self.manager
    }

    async fn load(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_persistence_error)
    }
}

#[async_trait]
impl<R, T> AccountRegistration for AccountsService<R, T>
where
    R: AccountRepository,
    T: TokenRepository,
{
    async fn register(&self, request: RegistrationRequest) -> Result<Account, Error> {
        let RegistrationRequest {
            email,
            password,
            name,
        } = request;
        let password = Password::with_policy(password.as_str()).map_err(|err| password_error(&err))?;
        self.manager
            .create_user(NewAccount {
                email: Some(email),
                password: Some(password),
                name,
                is_active: true,
            })
            .await
    }
}

#[async_trait]
impl<R, T> LoginService for AccountsService<R, T>
where
    R: AccountRepository,
    T: TokenRepository,
{
    async fn obtain_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let account = match EmailAddress::parse(credentials.email()) {
            Ok(email) => self
                .accounts
                .find_by_email(&email)
                .await
                .map_err(map_account_persistence_error)?,
            Err(_) => None,
        };
        let Some(account) = account else {
            debug!("token requested for unknown email");
            PasswordHash::verify_decoy(credentials.password());
            return Err(invalid_credentials());
        };
        if !account.check_password(credentials.password()) {
            debug!(account_id = %account.id(), "token requested with wrong password");
            return Err(invalid_credentials());
        }
        if !account.is_active() {
            debug!(account_id = %account.id(), "token requested for inactive account");
            return Err(invalid_credentials());
        }
        self.tokens
            .get_or_insert(account.id(), &AuthToken::generate())
            .await
            .map_err(map_token_persistence_error)
    }
}

#[async_trait]
impl<R, T> TokenAuthenticator for AccountsService<R, T>
where
    R: AccountRepository,
    T: TokenRepository,
{
    async fn authenticate(&self, token: &AuthToken) -> Result<Account, Error> {
        let account_id = self
            .tokens
            .find_account_id(token)
            .await
            .map_err(map_token_persistence_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))?;
        match self.load(&account_id).await? {
            Some(account) if account.is_active() => Ok(account),
            Some(_) => Err(Error::unauthorized("account is inactive")),
            None => Err(Error::unauthorized(INVALID_TOKEN)),
        }
    }
}

#[async_trait]
impl<R, T> ProfileQuery for AccountsService<R, T>
where
    R: AccountRepository,
    T: TokenRepository,
{
    async fn fetch_profile(&self, account_id: &AccountId) -> Result<Account, Error> {
        self.load(account_id)
            .await?
            .ok_or_else(|| Error::not_found("account not found"))
    }
}

#[async_trait]
impl<R, T> ProfileCommand for AccountsService<R, T>
where
    R: AccountRepository,
    T: TokenRepository,
{
    async fn update_profile(
        &self,
        account_id: &AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, Error> {
        let mut account = self.fetch_profile(account_id).await?;
        if update.is_empty() {
            return Ok(account);
        }

        let ProfileUpdate {
            email,
            name,
            password,
        } = update;
        if let Some(email) = email {
            account.set_email(EmailAddress::parse(email).map_err(|err| email_error(&err))?);
        }
        if let Some(name) = name {
            account.set_name(DisplayName::new(name).map_err(|err| account_validation_error(&err))?);
        }
        if let Some(password) = password {
            account.set_password(hash_with_policy(password.as_str())?);
        }

        let updated = self
            .accounts
            .update(&account)
            .await
            .map_err(map_account_persistence_error)?;
        if !updated {
            return Err(Error::not_found("account not found"));
        }
        info!(account_id = %account.id(), "profile updated");
        Ok(account)
    }
}
