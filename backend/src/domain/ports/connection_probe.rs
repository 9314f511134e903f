//! Port used to check whether the database accepts connections.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failure reported by a single probe attempt.
    pub enum ProbeError {
        /// The backing service refused or dropped the connection.
        Unavailable { message: String } => "database unavailable: {message}",
    }
}

/// A single connectivity check against the database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    /// Attempt one connection and report whether it succeeded.
    async fn probe(&self) -> Result<(), ProbeError>;
}
