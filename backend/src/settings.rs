//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ACCOUNTS_*` environment variables and
//! configuration files, in that order of precedence. The database URL also
//! honours the conventional `DATABASE_URL` variable when no `ACCOUNTS_`
//! value is set.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_INTERVAL, DEFAULT_MAX_INTERVAL, WaitPolicy};

/// Conventional variable read when `ACCOUNTS_DATABASE_URL` is unset.
pub const DATABASE_URL_FALLBACK: &str = "DATABASE_URL";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_INTERVAL_SECS: u64 = DEFAULT_INTERVAL.as_secs();
const DEFAULT_MAX_INTERVAL_SECS: u64 = DEFAULT_MAX_INTERVAL.as_secs();

fn database_url_or_fallback(configured: Option<&str>) -> Option<String> {
    configured
        .map(str::to_owned)
        .or_else(|| env::var(DATABASE_URL_FALLBACK).ok())
        .filter(|url| !url.trim().is_empty())
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL. Without one the server keeps accounts in
    /// memory.
    pub database_url: Option<String>,
    /// Apply embedded migrations before serving. Read from the environment
    /// or configuration files only; a CLI switch reports `false` when absent.
    #[ortho_config(default = true, skip_cli)]
    pub run_migrations: bool,
    /// Block until the database accepts connections before serving.
    #[ortho_config(default = false, skip_cli)]
    pub wait_for_db: bool,
    /// Maximum number of pooled connections.
    pub pool_max_size: Option<u32>,
}

impl ServerSettings {
    /// Return the bind address, defaulting to `0.0.0.0:8080`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Return the configured database URL, falling back to `DATABASE_URL`.
    #[must_use]
    pub fn database_url(&self) -> Option<String> {
        database_url_or_fallback(self.database_url.as_deref())
    }
}

/// Settings for the database wait loop.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct DatabaseWaitSettings {
    /// PostgreSQL connection URL to probe.
    pub database_url: Option<String>,
    /// Seconds to sleep after the first failed attempt.
    #[ortho_config(default = DEFAULT_INTERVAL_SECS)]
    pub wait_interval_secs: Option<u64>,
    /// Multiplier applied to the delay after each further failure. `0` is
    /// treated as `1`.
    #[ortho_config(default = 1)]
    pub wait_backoff_factor: Option<u32>,
    /// Upper bound on the delay, in seconds.
    #[ortho_config(default = DEFAULT_MAX_INTERVAL_SECS)]
    pub wait_max_interval_secs: Option<u64>,
    /// Give up after this many failed attempts.
    pub wait_max_attempts: Option<u32>,
    /// Give up after this many seconds.
    pub wait_timeout_secs: Option<u64>,
}

impl DatabaseWaitSettings {
    /// Return the configured database URL, falling back to `DATABASE_URL`.
    #[must_use]
    pub fn database_url(&self) -> Option<String> {
        database_url_or_fallback(self.database_url.as_deref())
    }

    /// Build the retry policy, using [`WaitPolicy::default`] for unset values.
    #[must_use]
    pub fn policy(&self) -> WaitPolicy {
        let defaults = WaitPolicy::default();
        WaitPolicy {
            interval: self
                .wait_interval_secs
                .map_or(defaults.interval, Duration::from_secs),
            backoff_factor: self
                .wait_backoff_factor
                .unwrap_or(defaults.backoff_factor)
                .max(1),
            max_interval: self
                .wait_max_interval_secs
                .map_or(defaults.max_interval, Duration::from_secs),
            max_attempts: self.wait_max_attempts,
            timeout: self.wait_timeout_secs.map(Duration::from_secs),
        }
    }
}
