//! Repository implementations of the core store traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod currency;
pub mod refresh_token;
pub mod user;

pub use currency::CurrencyRepository;
pub use refresh_token::RefreshTokenRepository;
pub use user::UserRepository;

use fxcalc_core::store::StoreError;
use sea_orm::{DbErr, SqlErr};

/// Maps a `SeaORM` error into a store error, surfacing unique violations.
pub(crate) fn store_error(err: DbErr, key: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Duplicate(key.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Maps a `SeaORM` error where no unique constraint is in play.
pub(crate) fn backend_error(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}
