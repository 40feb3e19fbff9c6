//! Error types for the HR system.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while managing HR records,
//! computing payroll or authenticating users.

use thiserror::Error;

/// The main error type for the HR system.
///
/// All library operations return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hr_system::error::HrError;
///
/// let error = HrError::ConfigNotFound {
///     path: "/missing/hr.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/hr.yaml");
/// ```
#[derive(Debug, Error)]
pub enum HrError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A field in a request or record was invalid.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A record was not found.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record (e.g. "employee").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The operation would violate a uniqueness rule.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting record.
        message: String,
    },

    /// Username or password did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The request carried no valid session.
    #[error("Authentication required: {message}")]
    Unauthorized {
        /// Why the session was rejected.
        message: String,
    },

    /// The authenticated user may not perform this operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why access was denied.
        message: String,
    },

    /// Payroll could not be computed from the given inputs.
    #[error("Calculation error: {message}")]
    Calculation {
        /// A description of the calculation error.
        message: String,
    },

    /// Password hashing failed.
    #[error("Password hashing failed: {message}")]
    PasswordHash {
        /// A description of the failure.
        message: String,
    },

    /// The database reported an error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HrError {
    /// Shorthand for a [`HrError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HrError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrError::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        HrError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`HrError::Forbidden`] error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        HrError::Forbidden {
            message: message.into(),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for HrError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        HrError::Database(sqlx::Error::Migrate(Box::new(error)))
    }
}

/// A type alias for Results that return HrError.
pub type HrResult<T> = Result<T, HrError>;
