//! Token error types.

use fxcalc_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Token-related errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is missing, malformed, expired, revoked or badly signed.
    /// The cause is deliberately not distinguished.
    #[error("Invalid token.")]
    InvalidToken,

    /// Signing an access token failed.
    #[error("failed to sign access token: {0}")]
    Signing(String),

    /// A configured lifetime pushes a timestamp out of range.
    #[error("token lifetime out of range: {0}")]
    LifetimeOutOfRange(String),

    /// The token store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => Self::Forbidden("Invalid token.".to_string()),
            TokenError::Signing(msg) => Self::Internal(msg),
            e @ TokenError::LifetimeOutOfRange(_) => Self::Internal(e.to_string()),
            TokenError::Store(e) => Self::Database(e.to_string()),
        }
    }
}
