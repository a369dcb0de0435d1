//! Application-wide error type.
//!
//! Domain errors are folded into [`AppError`] before they reach the HTTP
//! boundary. Client-facing variants carry the exact message sent back to the
//! caller; `Database` and `Internal` carry detail for the logs only.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Message sent in place of any server-side failure detail.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Classified application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing credentials, failed login, or a token whose user is gone (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Invalid access token or missing role (403).
    #[error("{0}")]
    Forbidden(String),

    /// Referenced currency or rate does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Rejected input (400).
    #[error("{0}")]
    Validation(String),

    /// Duplicate currency (409).
    #[error("{0}")]
    Conflict(String),

    /// Storage failure (500).
    #[error("storage failure: {0}")]
    Database(String),

    /// Any other server-side failure (500).
    #[error("internal failure: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code, used as a log field.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for server-side failures, whose detail must not reach the caller.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Message that may be shown to the caller.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg) => msg,
            Self::Database(_) | Self::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
