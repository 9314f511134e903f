//! Domain primitives, services and ports.
//!
//! Purpose: define the account model and the use-cases built on it without
//! depending on HTTP or Diesel. Inbound adapters talk to the services through
//! the driving ports in [`ports`]; outbound adapters implement the driven
//! ports.
//!
//! Public surface:
//! - [`Account`], [`EmailAddress`], [`Password`], [`PasswordHash`],
//!   [`AuthToken`]: value types with their invariants.
//! - [`AccountManager`]: the factory for ordinary and privileged accounts.
//! - [`AccountsService`]: registration, token issuance, token authentication
//!   and profile use-cases.
//! - [`wait_for_database`]: startup wait loop over a [`ports::ConnectionProbe`].
//! - [`Error`], [`ErrorCode`]: transport-agnostic failures.

pub mod account;
mod account_errors;
mod account_manager;
mod accounts_service;
pub mod auth;
pub mod db_wait;
pub mod email;
pub mod error;
pub mod password;
pub mod ports;
mod trace_id;

pub use self::account::{
    Account, AccountId, AccountParts, AccountValidationError, DISPLAY_NAME_MAX, DisplayName,
};
pub use self::account_errors::INVALID_CREDENTIALS;
pub use self::account_manager::{AccountManager, NewAccount};
pub use self::accounts_service::AccountsService;
pub use self::auth::{AuthToken, LoginCredentials, LoginValidationError, TokenFormatError};
pub use self::db_wait::{
    DEFAULT_INTERVAL, DEFAULT_MAX_INTERVAL, WaitError, WaitEvent, WaitObserver, WaitPolicy,
    WaitReport, wait_for_database,
};
pub use self::email::{EMAIL_MAX, EmailAddress, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{
    PASSWORD_MIN_LENGTH, Password, PasswordHash, PasswordHashError, PasswordValidationError,
    StoredHashError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
