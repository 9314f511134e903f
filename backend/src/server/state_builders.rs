//! Builders for the HTTP and health state shared by every worker.

use std::sync::Arc;

use accounts::domain::AccountsService;
use accounts::inbound::http::health::HealthState;
use accounts::inbound::http::state::HttpState;
use accounts::outbound::memory::InMemoryAccountStore;
use accounts::outbound::persistence::{DieselAccountRepository, DieselTokenRepository};
use mockable::DefaultClock;
use tracing::warn;

use super::ServerConfig;

/// Wire the accounts service to Diesel repositories when a pool is configured,
/// otherwise to a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => HttpState::from_service(AccountsService::new(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselTokenRepository::new(pool.clone())),
            clock,
        )),
        None => {
            warn!("no database configured; accounts are kept in memory");
            let store = Arc::new(InMemoryAccountStore::default());
            HttpState::from_service(AccountsService::new(Arc::clone(&store), store, clock))
        }
    }
}

/// Build the health state, attaching the pool as readiness probe if present.
pub(super) fn build_health_state(config: &ServerConfig) -> HealthState {
    match &config.db_pool {
        Some(pool) => HealthState::new().with_probe(Arc::new(pool.clone())),
        None => HealthState::new(),
    }
}
