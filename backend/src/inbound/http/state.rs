//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountRegistration, LoginService, ProfileCommand, ProfileQuery, TokenAuthenticator,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn AccountRegistration>,
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenAuthenticator>,
    pub profile: Arc<dyn ProfileQuery>,
    pub profile_updates: Arc<dyn ProfileCommand>,
}

impl HttpState {
    /// Wire every port to a single service implementing all of them.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::AccountsService;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::outbound::memory::InMemoryAccountStore;
    ///
    /// let store = Arc::new(InMemoryAccountStore::default());
    /// let service = AccountsService::new(
    ///     Arc::clone(&store),
    ///     store,
    ///     Arc::new(mockable::DefaultClock),
    /// );
    /// let state = HttpState::from_service(service);
    /// let _login = state.login.clone();
    /// ```
    pub fn from_service<S>(service: S) -> Self
    where
        S: AccountRegistration
            + LoginService
            + TokenAuthenticator
            + ProfileQuery
            + ProfileCommand
            + 'static,
    {
        let service = Arc::new(service);
        Self {
            registration: service.clone(),
            login: service.clone(),
            tokens: service.clone(),
            profile: service.clone(),
            profile_updates: service,
        }
    }
}
