//! In-memory account and token storage.
//!
//! Backs the server when no database URL is configured and gives integration
//! tests a real adapter without PostgreSQL. One store implements both
//! repository ports so tokens and accounts share a lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, TokenPersistenceError, TokenRepository,
};
use crate::domain::{Account, AccountId, AuthToken, EmailAddress};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    tokens_by_key: HashMap<AuthToken, AccountId>,
    tokens_by_account: HashMap<AccountId, AuthToken>,
}

impl Tables {
    fn email_taken_by_other(&self, account: &Account) -> bool {
        self.accounts
            .values()
            .any(|existing| existing.email() == account.email() && existing.id() != account.id())
    }
}

/// Thread-safe in-memory implementation of the account and token ports.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    tables: Mutex<Tables>,
}

impl InMemoryAccountStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Poisoning is ignored; no critical section leaves the maps inconsistent.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let mut tables = self.lock();
        if tables.email_taken_by_other(account) {
            return Err(AccountPersistenceError::duplicate_email(account.email().as_ref()));
        }
        if tables.accounts.contains_key(account.id()) {
            return Err(AccountPersistenceError::query("account id already exists"));
        }
        tables.accounts.insert(*account.id(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<bool, AccountPersistenceError> {
        let mut tables = self.lock();
        if !tables.accounts.contains_key(account.id()) {
            return Ok(false);
        }
        if tables.email_taken_by_other(account) {
            return Err(AccountPersistenceError::duplicate_email(account.email().as_ref()));
        }
        tables.accounts.insert(*account.id(), account.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.lock().accounts.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self
            .lock()
            .accounts
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }
}

#[async_trait]
impl TokenRepository for InMemoryAccountStore {
    async fn get_or_insert(
        &self,
        account_id: &AccountId,
        candidate: &AuthToken,
    ) -> Result<AuthToken, TokenPersistenceError> {
        let mut tables = self.lock();
        if let Some(existing) = tables.tokens_by_account.get(account_id) {
            return Ok(existing.clone());
        }
        tables
            .tokens_by_key
            .insert(candidate.clone(), *account_id);
        tables
            .tokens_by_account
            .insert(*account_id, candidate.clone());
        Ok(candidate.clone())
    }

    async fn find_account_id(
        &self,
        token: &AuthToken,
    ) -> Result<Option<AccountId>, TokenPersistenceError> {
        Ok(self.lock().tokens_by_key.get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountParts, DisplayName, PasswordHash};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn account(email: &str) -> Account {
        Account::from_parts(AccountParts {
            id: AccountId::random(),
            email: EmailAddress::parse(email).expect("valid email"),
            name: DisplayName::default(),
            password: PasswordHash::unusable(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
        })
        .expect("valid account")
    }

    #[fixture]
    fn store() -> InMemoryAccountStore {
        InMemoryAccountStore::default()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_email(store: InMemoryAccountStore) {
        store.insert(&account("a@example.com")).await.expect("first insert");
        let error = store
            .insert(&account("a@EXAMPLE.com"))
            .await
            .expect_err("duplicate");

        assert!(matches!(error, AccountPersistenceError::DuplicateEmail { .. }));
        assert_eq!(store.account_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_email_matches_normalised_value(store: InMemoryAccountStore) {
        let stored = account("Case@Example.com");
        store.insert(&stored).await.expect("insert");

        let lookup = EmailAddress::parse("Case@EXAMPLE.COM").expect("valid email");
        let found = store.find_by_email(&lookup).await.expect("lookup");
        assert_eq!(found.as_ref().map(Account::id), Some(stored.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_account_reports_false(store: InMemoryAccountStore) {
        let updated = store.update(&account("ghost@example.com")).await.expect("update");
        assert!(!updated);
    }

    #[rstest]
    #[tokio::test]
    async fn get_or_insert_keeps_first_token(store: InMemoryAccountStore) {
        let id = AccountId::random();
        let first = AuthToken::generate();
        let kept = store.get_or_insert(&id, &first).await.expect("insert");
        let again = store
            .get_or_insert(&id, &AuthToken::generate())
            .await
            .expect("lookup");

        assert_eq!(kept, first);
        assert_eq!(again, first);
        assert_eq!(store.find_account_id(&first).await.expect("find"), Some(id));
    }
}
