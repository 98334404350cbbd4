//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! The query and aggregation core never fails; every variant here belongs to a
//! collaborator (entry store, access gate, export, configuration).

use thiserror::Error;

/// Represents specific error cases that can occur during entry store operations.
///
/// # Examples
///
/// ```
/// use daybook::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database', the diary file may be corrupted or was written by another program.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other daybook instances.")]
    Pool(#[from] r2d2::Error),

    /// Requested entry not found in database.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Custom database error with detailed message.
    #[error("Database error: {0}")]
    Custom(String),
}

/// Represents the ways unlocking the journal can fail.
///
/// A failed attempt leaves the access gate locked; every variant is
/// recoverable by trying again.
///
/// # Examples
///
/// ```
/// use daybook::errors::AuthError;
///
/// let error = AuthError::Locked;
/// let message = format!("{}", error);
/// assert!(message.contains("locked"));
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// The gate is locked and the operation needs a fresh unlock.
    #[error("Journal is locked. Run the command again to unlock it.\n\nNote: the journal locks itself shortly after each unlock (configurable via DAYBOOK_REAUTH_TIMEOUT).")]
    Locked,

    /// The credential was checked and rejected.
    #[error("Authentication failed: {0}")]
    Failed(String),

    /// No way to authenticate on this system.
    #[error("Authentication is unavailable: {0}")]
    Unavailable(String),

    /// The two passphrases typed during first-run setup differ.
    #[error("Passphrases do not match. Please try again.")]
    PassphraseMismatch,

    /// An empty passphrase was entered.
    #[error("Passphrase cannot be empty.")]
    EmptyPassphrase,

    /// Reading the passphrase from the terminal failed.
    #[error("Failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// Hashing or parsing the stored passphrase hash failed.
    #[error("Passphrase hash error: {0}")]
    Hash(String),
}

/// Represents all possible errors that can occur in the daybook application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use daybook::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use daybook::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal logic (e.g., invalid date formats, ambiguous ids).
    #[error("Journal logic error: {0}")]
    Journal(String),

    /// An entry draft that cannot be saved (blank title or content).
    #[error("Invalid entry: {0}")]
    Validation(String),

    /// Errors selecting or rendering an export document.
    #[error("Export error: {0}")]
    Export(String),

    /// Errors related to entry store operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to unlocking the journal.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Errors serializing export documents.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use daybook::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Journal("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let app_io_error = AppError::Io(io_error);
        assert_eq!(format!("{}", app_io_error), "I/O error: permission denied");

        let journal_error = AppError::Journal("Invalid date".to_string());
        assert_eq!(
            format!("{}", journal_error),
            "Journal logic error: Invalid date"
        );

        let validation_error = AppError::Validation("title is blank".to_string());
        assert_eq!(
            format!("{}", validation_error),
            "Invalid entry: title is blank"
        );

        let export_error = AppError::Export("start after end".to_string());
        assert_eq!(format!("{}", export_error), "Export error: start after end");
    }

    #[test]
    fn test_database_error_conversion_to_app_error() {
        let db_error = DatabaseError::NotFound("Entry with id abc not found".to_string());
        let app_error: AppError = db_error.into();

        match app_error {
            AppError::Database(DatabaseError::NotFound(msg)) => {
                assert!(msg.contains("abc"));
            }
            _ => panic!("Expected AppError::Database(NotFound) variant"),
        }
    }

    #[test]
    fn test_auth_error_conversion_and_display() {
        let app_error: AppError = AuthError::Failed("wrong passphrase".to_string()).into();
        let message = format!("{}", app_error);
        assert!(message.contains("Authentication error"));
        assert!(message.contains("wrong passphrase"));

        let locked = format!("{}", AuthError::Locked);
        assert!(locked.contains("locked"));
        assert!(locked.contains("DAYBOOK_REAUTH_TIMEOUT"));

        assert!(format!("{}", AuthError::PassphraseMismatch).contains("do not match"));
        assert!(format!("{}", AuthError::EmptyPassphrase).contains("cannot be empty"));
    }

    #[test]
    fn test_app_error_source_chaining() {
        let sqlite_error = rusqlite::Error::QueryReturnedNoRows;
        let app_error: AppError = DatabaseError::Sqlite(sqlite_error).into();

        let source = app_error.source().expect("database error should have a source");
        assert!(source.to_string().contains("Database error"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json")
            .expect_err("malformed JSON should fail to parse");
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::Serialization(_)));
    }

    #[test]
    fn test_result_combinators() {
        let io_result: Result<(), io::Error> = Err(io::Error::other("test error"));
        let app_result: AppResult<()> = io_result.map_err(AppError::Io);

        assert!(app_result.is_err());
        match app_result {
            Err(AppError::Io(inner)) => {
                assert_eq!(inner.kind(), io::ErrorKind::Other);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }
}
