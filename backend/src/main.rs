//! Accounts server entry-point: loads settings, prepares the database and
//! serves the REST API.

mod server;

use std::ffi::OsString;
use std::io;

use accounts::domain::{WaitEvent, wait_for_database};
use accounts::outbound::persistence::{
    DbPool, PgConnectionProbe, PoolConfig, run_pending_migrations_async,
};
use accounts::settings::{DatabaseWaitSettings, ServerSettings};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};

const PROGRAM: &str = "accounts-server";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("invalid configuration: {err}")))?;

    let mut config = ServerConfig::new(settings.bind_addr());
    if let Some(database_url) = settings.database_url() {
        if settings.wait_for_db {
            wait_for(&database_url).await?;
        }
        if settings.run_migrations {
            let applied = run_pending_migrations_async(database_url.clone())
                .await
                .map_err(io::Error::other)?;
            info!(applied, "database migrations applied");
        }
        let mut pool_config = PoolConfig::new(database_url);
        if let Some(max_size) = settings.pool_max_size {
            pool_config = pool_config.with_max_size(max_size);
        }
        let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let bind_addr = config.bind_addr;
    let server = create_server(config)?;
    info!(%bind_addr, "accounts server listening");
    server.await
}

/// Block until the database accepts connections, using the wait settings from
/// the environment and configuration files.
async fn wait_for(database_url: &str) -> io::Result<()> {
    let wait_settings = DatabaseWaitSettings::load_from_iter([OsString::from(PROGRAM)])
        .map_err(|err| io::Error::other(format!("invalid wait configuration: {err}")))?;
    let probe = PgConnectionProbe::new(database_url);
    let mut observer = |event: &WaitEvent| {
        if let WaitEvent::Unavailable {
            attempt, retry_in, ..
        } = event
        {
            info!(attempt, ?retry_in, "waiting for database");
        }
    };
    wait_for_database(&probe, &wait_settings.policy(), &mut observer)
        .await
        .map(|_| ())
        .map_err(io::Error::other)
}
