//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by a unique index; violations surface as
//! `AccountPersistenceError::DuplicateEmail`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{
    Account, AccountId, AccountParts, DisplayName, EmailAddress, PasswordHash,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AccountPersistenceError {
    map_pool_error(error, AccountPersistenceError::connection)
}

/// Map Diesel errors, attributing unique violations to `email`.
fn map_diesel_error(error: &diesel::result::Error, email: &EmailAddress) -> AccountPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => AccountPersistenceError::connection("database connection error"),
        DieselFailure::UniqueViolation => AccountPersistenceError::duplicate_email(email.as_ref()),
        DieselFailure::Query(message) => AccountPersistenceError::query(message),
    }
}

fn map_read_error(error: &diesel::result::Error) -> AccountPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => AccountPersistenceError::connection("database connection error"),
        DieselFailure::UniqueViolation => AccountPersistenceError::query("database error"),
        DieselFailure::Query(message) => AccountPersistenceError::query(message),
    }
}

/// Convert a database row into a validated domain account.
fn row_to_account(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let AccountRow {
        id,
        email,
        name,
        password_hash,
        is_active,
        is_staff,
        is_superuser,
        date_joined,
        updated_at: _,
    } = row;

    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        AccountPersistenceError::query(format!("stored account {id} has invalid {field}: {err}"))
    };
    let email = EmailAddress::from_stored(email).map_err(|err| corrupt("email", &err))?;
    let name = DisplayName::new(name).map_err(|err| corrupt("name", &err))?;
    let password = PasswordHash::from_stored(password_hash).map_err(|err| corrupt("password", &err))?;

    Account::from_parts(AccountParts {
        id: AccountId::from_uuid(id),
        email,
        name,
        password,
        is_active,
        is_staff,
        is_superuser,
        date_joined,
    })
    .map_err(|err| corrupt("flags", &err))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewAccountRow {
            id: *account.id().as_uuid(),
            email: account.email().as_ref(),
            name: account.name().as_ref(),
            password_hash: account.password().as_str(),
            is_active: account.is_active(),
            is_staff: account.is_staff(),
            is_superuser: account.is_superuser(),
            date_joined: account.date_joined(),
        };

        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(&err, account.email()))
    }

    async fn update(&self, account: &Account) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changes = AccountUpdate {
            email: account.email().as_ref(),
            name: account.name().as_ref(),
            password_hash: account.password().as_str(),
            is_active: account.is_active(),
            is_staff: account.is_staff(),
            is_superuser: account.is_superuser(),
        };

        let affected = diesel::update(accounts::table.find(*account.id().as_uuid()))
            .set((&changes, accounts::updated_at.eq(diesel::dsl::now)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, account.email()))?;
        Ok(affected > 0)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = accounts::table
            .find(*id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_error(&err))?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_error(&err))?;
        row.map(row_to_account).transpose()
    }
}
