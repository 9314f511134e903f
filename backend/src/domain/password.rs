//! Plaintext passwords and their Argon2id hashes.
//!
//! [`Password`] wipes its buffer on drop and never prints its contents.
//! [`PasswordHash`] holds a PHC string (`$argon2id$...`) or an unusable marker
//! (`!` followed by random characters) for accounts created without a
//! password. Unusable hashes never verify.

use std::fmt;
use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use tracing::warn;
use zeroize::Zeroizing;

/// Minimum number of characters accepted by [`Password::with_policy`].
pub const PASSWORD_MIN_LENGTH: usize = 5;

const UNUSABLE_PREFIX: char = '!';
const UNUSABLE_SUFFIX_LEN: usize = 40;
const DECOY_PLAINTEXT: &str = "decoy-password-for-unknown-accounts";

static DECOY_HASH: OnceLock<Option<PasswordHash>> = OnceLock::new();

/// Validation errors for plaintext passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("password required")]
    Empty,
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
}

/// Hashing failed inside the Argon2 implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Errors returned when a stored hash cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored password hash is neither a PHC string nor an unusable marker")]
pub struct StoredHashError;

/// Plaintext password supplied by a client.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        Ok(Self(raw))
    }

    /// Accept a password that meets [`PASSWORD_MIN_LENGTH`].
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{Password, PasswordValidationError};
    ///
    /// assert!(Password::with_policy("pw").is_err());
    /// assert!(Password::with_policy("testpass").is_ok());
    /// ```
    pub fn with_policy(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let password = Self::new(raw)?;
        if password.0.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordValidationError::TooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(password)
    }

    /// Borrow the plaintext.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// One-way password hash as stored alongside an account.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with Argon2id and a fresh random salt.
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError {
                message: err.to_string(),
            })?;
        Ok(Self(phc.to_string()))
    }

    /// A marker that never matches any password.
    #[must_use]
    pub fn unusable() -> Self {
        let suffix: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(UNUSABLE_SUFFIX_LEN)
            .map(char::from)
            .collect();
        Self(format!("{UNUSABLE_PREFIX}{suffix}"))
    }

    /// Load a hash read back from storage.
    pub fn from_stored(stored: impl Into<String>) -> Result<Self, StoredHashError> {
        let stored = stored.into();
        if stored.starts_with(UNUSABLE_PREFIX) || PhcString::new(&stored).is_ok() {
            Ok(Self(stored))
        } else {
            Err(StoredHashError)
        }
    }

    /// Whether the hash can ever verify a password.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.0.starts_with(UNUSABLE_PREFIX)
    }

    /// Check `candidate` against the stored hash.
    #[must_use]
    pub fn verify(&self, candidate: &Password) -> bool {
        if !self.is_usable() {
            return false;
        }
        let parsed = match PhcString::new(&self.0) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "stored password hash failed to parse");
                return false;
            }
        };
        Argon2::default()
            .verify_password(candidate.expose().as_bytes(), &parsed)
            .is_ok()
    }

    /// Run a full Argon2 verification against a fixed hash and discard the
    /// result.
    ///
    /// Login calls this when no account matches, so a miss costs as much as a
    /// wrong password.
    pub fn verify_decoy(candidate: &Password) {
        let decoy = DECOY_HASH.get_or_init(|| {
            Password::new(DECOY_PLAINTEXT)
                .ok()
                .and_then(|plaintext| Self::hash(&plaintext).ok())
        });
        match decoy {
            Some(hash) => {
                let _matched: bool = hash.verify(candidate);
            }
            None => warn!("decoy password hash unavailable"),
        }
    }

    /// Borrow the encoded hash for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
