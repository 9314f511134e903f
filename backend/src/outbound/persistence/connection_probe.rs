//! Probe that opens a fresh PostgreSQL connection.
//!
//! Used by the `wait-for-db` command, where no pool exists yet and every
//! attempt must open its own connection.

use async_trait::async_trait;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use tracing::debug;

use crate::domain::ports::{ConnectionProbe, ProbeError};

/// Connects to `database_url` once per probe and drops the connection.
#[derive(Debug, Clone)]
pub struct PgConnectionProbe {
    database_url: String,
}

impl PgConnectionProbe {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl ConnectionProbe for PgConnectionProbe {
    async fn probe(&self) -> Result<(), ProbeError> {
        match AsyncPgConnection::establish(&self.database_url).await {
            Ok(_connection) => Ok(()),
            Err(error) => {
                debug!(%error, "database connection attempt failed");
                Err(ProbeError::unavailable(error.to_string()))
            }
        }
    }
}
