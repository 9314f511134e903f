//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ConnectionProbe`]) are implemented by
//! outbound adapters. Driving ports ([`AccountRegistration`],
//! [`LoginService`], [`TokenAuthenticator`], [`ProfileQuery`],
//! [`ProfileCommand`]) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registration;
mod account_repository;
mod connection_probe;
mod login_service;
mod profile;
mod token_authenticator;
mod token_repository;

#[cfg(test)]
pub use account_registration::MockAccountRegistration;
pub use account_registration::{AccountRegistration, RegistrationRequest};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use connection_probe::MockConnectionProbe;
pub use connection_probe::{ConnectionProbe, ProbeError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use profile::{MockProfileCommand, MockProfileQuery};
pub use profile::{ProfileCommand, ProfileQuery, ProfileUpdate};
#[cfg(test)]
pub use token_authenticator::MockTokenAuthenticator;
pub use token_authenticator::TokenAuthenticator;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenPersistenceError, TokenRepository};
