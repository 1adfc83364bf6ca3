//! Unified error types and result handling for the whole crate.
//!
//! Core functions return [`Result`] everywhere; the web layer maps these
//! variants onto HTTP status codes. Storage failures are wrapped verbatim
//! and propagated — there is no retry policy, each write is a single attempt.

use thiserror::Error;

/// All error conditions the application can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problem (missing file, bad TOML, bad environment)
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// Input failed validation (empty username, empty category, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the rejected input
        message: String,
    },

    /// Transaction or budget amount is not a usable number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending value
        amount: f64,
    },

    /// Transaction kind string is not one of the known kinds
    #[error("Unknown transaction kind: {kind}")]
    InvalidKind {
        /// The unrecognized kind label
        kind: String,
    },

    /// Referenced user does not exist
    #[error("User not found: {user}")]
    UserNotFound {
        /// User id or username used for the lookup
        user: String,
    },

    /// Registration attempted with a username that already exists
    #[error("Username already taken: {username}")]
    UsernameTaken {
        /// The duplicate username
        username: String,
    },

    /// Login with a wrong username/password combination
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Underlying persistence failure, propagated uncaught
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config file reads and the like)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
