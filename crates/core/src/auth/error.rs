//! Authentication error types.

use fxcalc_shared::AppError;
use thiserror::Error;

use super::password::PasswordError;
use crate::store::StoreError;
use crate::token::TokenError;

/// Message returned for every failed login, whatever the cause.
pub const LOGIN_FAILED: &str = "Login failed.";

/// Message returned for every unusable refresh token.
pub const INVALID_TOKEN: &str = "Invalid token.";

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are not distinguished.
    #[error("Login failed.")]
    InvalidCredentials,

    /// Registration with an email that already exists.
    #[error("{0} already exists.")]
    EmailTaken(String),

    /// Registration input rejected.
    #[error("{0}")]
    Validation(String),

    /// Refresh token unknown, expired or revoked.
    #[error("Invalid token.")]
    InvalidToken,

    /// Refresh token is valid but its user no longer exists.
    #[error("Invalid token.")]
    OrphanedToken,

    /// Logout with a token that is absent or already revoked.
    #[error("Invalid token.")]
    NotRevocable,

    /// No user is registered under the email.
    #[error("No user registered as {0}")]
    UnknownUser(String),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token service failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// User store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::InvalidCredentials | AuthError::OrphanedToken => Self::Unauthorized(message),
            AuthError::InvalidToken => Self::Forbidden(message),
            AuthError::UnknownUser(_) => Self::NotFound(message),
            AuthError::EmailTaken(_) | AuthError::Validation(_) | AuthError::NotRevocable => {
                Self::Validation(message)
            }
            AuthError::Password(_) => Self::Internal(message),
            AuthError::Token(e) => e.into(),
            AuthError::Store(_) => Self::Database(message),
        }
    }
}
