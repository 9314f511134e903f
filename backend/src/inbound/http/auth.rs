//! Token authentication for HTTP handlers.
//!
//! Handlers that need a caller take an [`AuthenticatedAccount`] argument. The
//! extractor reads `Authorization: Token <key>` (or `Bearer <key>`), resolves
//! the key through the [`TokenAuthenticator`](crate::domain::ports::TokenAuthenticator)
//! port and rejects the request with `401` when any step fails.

use actix_web::http::header::{AUTHORIZATION, HeaderValue};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Account, AuthToken, Error};

use super::state::HttpState;

const SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// The account that presented a valid token.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(Account);

impl AuthenticatedAccount {
    /// The authenticated account.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.0
    }

    /// Consume the wrapper and return the account.
    #[must_use]
    pub fn into_inner(self) -> Account {
        self.0
    }
}

/// Extract the token key from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; the header must contain exactly
/// the scheme and the key.
fn parse_authorization(value: &str) -> Result<AuthToken, Error> {
    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(key), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::unauthorized("invalid token header"));
    };
    if !SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme))
    {
        return Err(Error::unauthorized("unsupported authentication scheme"));
    }
    AuthToken::parse(key).map_err(|_| Error::unauthorized("invalid token"))
}

fn token_from_header(header: Option<&HeaderValue>) -> Result<AuthToken, Error> {
    let header = header
        .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("invalid token header"))?;
    parse_authorization(value)
}

impl FromRequest for AuthenticatedAccount {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req.headers().get(AUTHORIZATION).cloned();
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        // Errors are built inside the future so they pick up the request's
        // trace identifier.
        Box::pin(async move {
            let token = token_from_header(header.as_ref()).inspect_err(|err| {
                debug!(reason = %err.message(), "rejected credentials");
            })?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state missing from application data"))?;
            state.tokens.authenticate(&token).await.map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const KEY: &str = "0123456789abcdef0123456789abcdef01234567";

    #[rstest]
    #[case("Token")]
    #[case("Bearer")]
    #[case("token")]
    fn accepts_known_schemes(#[case] scheme: &str) {
        let token = parse_authorization(&format!("{scheme} {KEY}")).expect("valid header");
        assert_eq!(token.as_str(), KEY);
    }

    #[rstest]
    fn missing_header_is_unauthorised() {
        let error = token_from_header(None).expect_err("missing header");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("")]
    #[case("Token")]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Token abc")]
    #[case("Token 0123456789abcdef0123456789abcdef01234567 extra")]
    fn rejects_malformed_headers(#[case] header: &str) {
        let error = parse_authorization(header).expect_err("header should be rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
