//! PostgreSQL-backed `TokenRepository` implementation.
//!
//! Get-or-create is an `INSERT ... ON CONFLICT (account_id) DO NOTHING`
//! followed by a read, so concurrent logins for one account agree on a key.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{TokenPersistenceError, TokenRepository};
use crate::domain::{AccountId, AuthToken};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the token repository port.
#[derive(Clone)]
pub struct DieselTokenRepository {
    pool: DbPool,
}

impl DieselTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> TokenPersistenceError {
    map_pool_error(error, TokenPersistenceError::connection)
}

fn map_diesel_error(error: &diesel::result::Error) -> TokenPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => TokenPersistenceError::connection("database connection error"),
        DieselFailure::UniqueViolation => TokenPersistenceError::query("token key collision"),
        DieselFailure::Query(message) => TokenPersistenceError::query(message),
    }
}

fn parse_stored(key: &str) -> Result<AuthToken, TokenPersistenceError> {
    AuthToken::parse(key).map_err(|err| TokenPersistenceError::query(err.to_string()))
}

#[async_trait]
impl TokenRepository for DieselTokenRepository {
    async fn get_or_insert(
        &self,
        account_id: &AccountId,
        candidate: &AuthToken,
    ) -> Result<AuthToken, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let inserted = diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                key: candidate.as_str(),
                account_id: *account_id.as_uuid(),
            })
            .on_conflict(auth_tokens::account_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        if inserted > 0 {
            debug!(%account_id, "token issued");
            return Ok(candidate.clone());
        }

        let key: String = auth_tokens::table
            .filter(auth_tokens::account_id.eq(*account_id.as_uuid()))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        parse_stored(&key)
    }

    async fn find_account_id(
        &self,
        token: &AuthToken,
    ) -> Result<Option<AccountId>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let account_id = auth_tokens::table
            .find(token.as_str())
            .select(auth_tokens::account_id)
            .first::<uuid::Uuid>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;
        Ok(account_id.map(AccountId::from_uuid))
    }
}
