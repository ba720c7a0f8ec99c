use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Error types for the market core
#[derive(Error, Debug)]
pub enum MarketError {
    /// Malformed input: bad hashtag characters, missing or malformed required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate email, username, category, tag or follow edge
    #[error("Uniqueness error: {0}")]
    Uniqueness(String),

    /// Credentials did not verify
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Password reuse or strength failure
    #[error("Policy error: {0}")]
    Policy(String),

    /// Self-follow, self-like, or mutation by someone who is not the owner
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Referenced entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The password hashing backend failed or a stored hash is unreadable
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl MarketError {
    /// Maps a unique-constraint violation to `Uniqueness` with the given message,
    /// leaving every other database error as `Database`.
    pub(crate) fn unique_or_db(err: DbErr, message: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            MarketError::Uniqueness(message.into())
        } else {
            error!(?err, "Unexpected database error");
            MarketError::Database(err)
        }
    }
}

impl From<argon2::password_hash::Error> for MarketError {
    fn from(error: argon2::password_hash::Error) -> Self {
        let err = MarketError::PasswordHash(error.to_string());
        error!(?err, "Password hashing failed");
        err
    }
}

/// True when the database rejected a write because of a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Type alias for Result with MarketError
pub type Result<T> = std::result::Result<T, MarketError>;
