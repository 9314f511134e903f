//! Translation of account validation and persistence failures into [`Error`].
//!
//! Validation failures carry `details` of the form
//! `{"field": "...", "code": "..."}` so clients can attach messages to form
//! fields.

use serde_json::json;

use super::ports::{AccountPersistenceError, TokenPersistenceError};
use super::{
    AccountValidationError, EmailValidationError, Error, PasswordHashError,
    PasswordValidationError,
};

/// Message returned for every failed credential check.
pub const INVALID_CREDENTIALS: &str = "unable to authenticate with provided credentials";

pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn email_error(error: &EmailValidationError) -> Error {
    let code = match error {
        EmailValidationError::Missing => "email_required",
        EmailValidationError::Malformed => "invalid_email",
        EmailValidationError::TooLong { .. } => "email_too_long",
    };
    field_error("email", code, error.to_string())
}

pub(crate) fn password_error(error: &PasswordValidationError) -> Error {
    let code = match error {
        PasswordValidationError::Empty => "password_required",
        PasswordValidationError::TooShort { .. } => "password_too_short",
    };
    field_error("password", code, error.to_string())
}

pub(crate) fn account_validation_error(error: &AccountValidationError) -> Error {
    match error {
        AccountValidationError::NameTooLong { .. } => {
            field_error("name", "name_too_long", error.to_string())
        }
        AccountValidationError::SuperuserWithoutStaff => Error::internal(error.to_string()),
    }
}

pub(crate) fn hash_error(error: &PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn invalid_credentials() -> Error {
    Error::invalid_request(INVALID_CREDENTIALS).with_details(json!({ "code": "invalid_credentials" }))
}

pub(crate) fn map_account_persistence_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountPersistenceError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountPersistenceError::DuplicateEmail { .. } => field_error(
            "email",
            "duplicate_email",
            "an account with this email already exists",
        ),
    }
}

pub(crate) fn map_token_persistence_error(error: TokenPersistenceError) -> Error {
    match error {
        TokenPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        TokenPersistenceError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(AccountPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(AccountPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[case(AccountPersistenceError::duplicate_email("a@b.c"), ErrorCode::InvalidRequest)]
    fn account_errors_map_to_codes(
        #[case] error: AccountPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_account_persistence_error(error).code(), expected);
    }

    #[rstest]
    fn duplicate_email_does_not_echo_the_address() {
        let error = map_account_persistence_error(AccountPersistenceError::duplicate_email(
            "someone@example.com",
        ));
        assert!(!error.message().contains("someone"));
        assert_eq!(
            error.details(),
            Some(&json!({"field": "email", "code": "duplicate_email"}))
        );
    }

    #[rstest]
    fn missing_email_reports_email_required() {
        let error = email_error(&EmailValidationError::Missing);
        assert_eq!(error.message(), "email required");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "email", "code": "email_required"}))
        );
    }
}
