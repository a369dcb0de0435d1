//! Currency error types.

use fxcalc_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Currency-related errors.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// Referenced currency does not exist.
    #[error("Currency {0} not found")]
    CurrencyNotFound(String),

    /// A currency with this symbol already exists.
    #[error("Currency {0} already exists")]
    CurrencyAlreadyExists(String),

    /// No direct rate edge between the two currencies (named by display name).
    #[error("Exchange rate from {from} to {to} not found")]
    ExchangeRateNotFound {
        /// Base currency name.
        from: String,
        /// Target currency name.
        to: String,
    },

    /// Base and target are the same symbol.
    #[error("Target and base should be different.")]
    SameCurrency,

    /// Rate is zero or negative.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    /// Converted amount does not fit in a decimal.
    #[error("Amount {0} is out of range for conversion")]
    AmountOutOfRange(Decimal),

    /// The currency store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        let message = err.to_string();
        match err {
            CurrencyError::CurrencyNotFound(_) | CurrencyError::ExchangeRateNotFound { .. } => {
                Self::NotFound(message)
            }
            CurrencyError::CurrencyAlreadyExists(_) => Self::Conflict(message),
            CurrencyError::SameCurrency
            | CurrencyError::InvalidRate(_)
            | CurrencyError::AmountOutOfRange(_) => Self::Validation(message),
            CurrencyError::Store(_) => Self::Database(message),
        }
    }
}
