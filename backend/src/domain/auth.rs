//! Authentication primitives: login credentials and API tokens.
//!
//! Handlers build these from raw strings before calling a driving port, so the
//! services never see unvalidated input.

use std::fmt;

use rand::{RngCore, rngs::OsRng};

use super::Password;

/// Number of random bytes behind every token key.
const TOKEN_BYTES: usize = 20;
/// Length of the hex-encoded token key.
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was missing or empty.
    EmptyPassword,
}

impl LoginValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Credentials presented to obtain a token.
///
/// ## Invariants
/// - `email` is trimmed and non-empty. It is normalised by the login service
///   at lookup time, not here.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use accounts::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" test@example.com ", "testpass").unwrap();
/// assert_eq!(creds.email(), "test@example.com");
/// assert_eq!(creds.password().expose(), "testpass");
/// ```
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        let password = Password::new(password).map_err(|_| LoginValidationError::EmptyPassword)?;
        Ok(Self {
            email: email.to_owned(),
            password,
        })
    }

    /// Email as supplied by the caller, trimmed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Error returned when a presented token key is not well formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("token must be {TOKEN_LENGTH} lower-case hexadecimal characters")]
pub struct TokenFormatError;

/// Opaque API token bound to one account.
///
/// Keys are 40 lower-case hex characters derived from 20 bytes of OS
/// randomness.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Validate a key presented by a client or read from storage.
    pub fn parse(raw: &str) -> Result<Self, TokenFormatError> {
        let well_formed = raw.len() == TOKEN_LENGTH
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(raw.to_owned()))
        } else {
            Err(TokenFormatError)
        }
    }

    /// Borrow the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the full key.
        let prefix = self.0.get(..6).unwrap_or_default();
        write!(f, "AuthToken({prefix}…)")
    }
}

impl From<AuthToken> for String {
    fn from(value: AuthToken) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("one", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_keep_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("a@b.c", " spaced ").expect("valid");
        assert_eq!(creds.password().expose(), " spaced ");
    }

    #[rstest]
    fn generated_tokens_are_forty_hex_chars() {
        let token = AuthToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_LENGTH);
        assert_eq!(AuthToken::parse(token.as_str()), Ok(token.clone()));
        assert_ne!(token, AuthToken::generate());
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("ABCDEF0123456789abcdef0123456789abcdef01")]
    #[case("g000000000000000000000000000000000000000")]
    fn parse_rejects_malformed_keys(#[case] raw: &str) {
        assert_eq!(AuthToken::parse(raw), Err(TokenFormatError));
    }

    #[rstest]
    fn debug_shows_prefix_only() {
        let token = AuthToken::parse("0123456789abcdef0123456789abcdef01234567").expect("valid");
        assert_eq!(format!("{token:?}"), "AuthToken(012345…)");
    }
}
