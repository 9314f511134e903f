//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between the internal Diesel rows (`models`,
//! `schema`) and domain types. No business rules live here; uniqueness and
//! the superuser-implies-staff rule are backed by database constraints as well
//! as by the domain.
//!
//! ```ignore
//! use accounts::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let accounts = DieselAccountRepository::new(pool.clone());
//! ```

mod connection_probe;
mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_token_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use connection_probe::PgConnectionProbe;
pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_token_repository::DieselTokenRepository;
pub use migrations::{MigrationError, run_pending_migrations, run_pending_migrations_async};
pub use pool::{DbPool, PoolConfig, PoolError};
