//! Normalised account email addresses.
//!
//! An address is split at its last `@`. The local part keeps its casing while
//! the domain is lower-cased, so `Test@FIROZSOFT.COM` is stored as
//! `Test@firozsoft.com`. Normalisation happens once, when the value is parsed
//! from user input; values read back from storage are only re-validated.

use std::fmt;

use serde::{Serialize, Serializer};

/// Maximum number of characters accepted in an email address.
pub const EMAIL_MAX: usize = 255;

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    Missing,
    Malformed,
    TooLong { max: usize },
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "email required"),
            Self::Malformed => write!(f, "enter a valid email address"),
            Self::TooLong { max } => write!(f, "email must be at most {max} characters"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// A validated, normalised email address.
///
/// # Examples
/// ```
/// use accounts::domain::EmailAddress;
///
/// let email = EmailAddress::parse("test@FIROZSOFT.COM").expect("valid email");
/// assert_eq!(email.as_ref(), "test@firozsoft.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim, validate and normalise raw user input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Missing);
        }
        let (local, domain) = split(trimmed)?;
        let normalised = format!("{local}@{}", domain.to_lowercase());
        check_length(&normalised)?;
        Ok(Self(normalised))
    }

    /// Rebuild an address that was normalised before it was stored.
    pub fn from_stored(stored: impl Into<String>) -> Result<Self, EmailValidationError> {
        let stored = stored.into();
        if stored.is_empty() {
            return Err(EmailValidationError::Missing);
        }
        split(&stored)?;
        check_length(&stored)?;
        Ok(Self(stored))
    }

    /// Part before the final `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(local, _)| local)
    }

    /// Lower-cased part after the final `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

fn split(value: &str) -> Result<(&str, &str), EmailValidationError> {
    let (local, domain) = value
        .rsplit_once('@')
        .ok_or(EmailValidationError::Malformed)?;
    if local.is_empty() || domain.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(EmailValidationError::Malformed);
    }
    Ok((local, domain))
}

fn check_length(value: &str) -> Result<(), EmailValidationError> {
    if value.chars().count() > EMAIL_MAX {
        return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
    }
    Ok(())
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl Serialize for EmailAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("test@FIROZSOFT.COM", "test@firozsoft.com")]
    #[case("Test.User@Example.ORG", "Test.User@example.org")]
    #[case("  padded@example.com  ", "padded@example.com")]
    #[case("weird\"@\"local@EXAMPLE.com", "weird\"@\"local@example.com")]
    fn parse_lowercases_domain_only(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::parse(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn parse_rejects_blank_input(#[case] raw: &str) {
        assert_eq!(EmailAddress::parse(raw), Err(EmailValidationError::Missing));
    }

    #[rstest]
    #[case("no-at-sign")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("us er@example.com")]
    fn parse_rejects_malformed_input(#[case] raw: &str) {
        assert_eq!(EmailAddress::parse(raw), Err(EmailValidationError::Malformed));
    }

    #[rstest]
    fn parse_rejects_overlong_addresses() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            EmailAddress::parse(raw),
            Err(EmailValidationError::TooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn from_stored_does_not_renormalise() {
        let email = EmailAddress::from_stored("legacy@MIXED.example").expect("stored email");
        assert_eq!(email.domain(), "MIXED.example");
    }

    #[rstest]
    fn accessors_split_at_last_at_sign() {
        let email = EmailAddress::parse("Person@Example.com").expect("valid email");
        assert_eq!(email.local_part(), "Person");
        assert_eq!(email.domain(), "example.com");
    }
}
