//! Persistence seams for users, refresh tokens and currencies.
//!
//! These traits are implemented by the db crate (PostgreSQL) and by
//! [`memory`] (in-process, used by tests and the `memory` database URL).
//! Each method is a single store operation; the services compose them and
//! own every cross-record invariant.

pub mod memory;

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{NewUser, User};
use crate::currency::Currency;
use crate::token::RefreshToken;

/// Errors surfaced by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Any other storage failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// User persistence.
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `StoreError::Duplicate` if the email exists.
    fn insert(&self, user: NewUser) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// Finds a user by normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Finds a user by ID.
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Replaces a user's role tags. Resolves to false if the user is absent.
    fn set_roles(
        &self,
        id: Uuid,
        roles: Vec<String>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Refresh token persistence.
pub trait RefreshTokenStore: Send + Sync {
    /// Inserts a token. Fails with `StoreError::Duplicate` if the token exists.
    fn insert(&self, token: RefreshToken) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Finds a token that is not revoked and expires after `now`.
    fn find_usable(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<RefreshToken>, StoreError>> + Send;

    /// Marks a single non-revoked token as revoked. Returns whether a record changed.
    fn revoke(&self, token: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Revokes every non-revoked token of a user. Returns the number changed.
    fn revoke_all_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Deletes tokens expired before `now`, and revoked tokens created before
    /// `revoked_before`. Returns the number deleted.
    fn delete_stale(
        &self,
        now: DateTime<Utc>,
        revoked_before: DateTime<Utc>,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Currency persistence. Rate edits are single-record map-key updates.
pub trait CurrencyStore: Send + Sync {
    /// Returns every currency, ordered by symbol.
    fn list(&self) -> impl Future<Output = Result<Vec<Currency>, StoreError>> + Send;

    /// Finds a currency by exact symbol.
    fn find(&self, symbol: &str) -> impl Future<Output = Result<Option<Currency>, StoreError>> + Send;

    /// Inserts a currency. Fails with `StoreError::Duplicate` if the symbol exists.
    fn insert(&self, currency: Currency) -> impl Future<Output = Result<Currency, StoreError>> + Send;

    /// Deletes a currency. Returns whether a record was deleted.
    fn delete(&self, symbol: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Sets `rates[target] = rate` on `symbol`. Returns whether the currency matched.
    fn set_rate(
        &self,
        symbol: &str,
        target: &str,
        rate: Decimal,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Removes `rates[target]` from `symbol`. Returns whether the currency matched.
    fn unset_rate(
        &self,
        symbol: &str,
        target: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Removes `target` from every currency's rates. Returns how many currencies changed.
    fn strip_rate_everywhere(
        &self,
        target: &str,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Type-level bundle of the three stores a running service uses.
pub trait Backend: Send + Sync + 'static {
    /// User store.
    type Users: UserStore + 'static;
    /// Refresh token store.
    type Tokens: RefreshTokenStore + 'static;
    /// Currency store.
    type Currencies: CurrencyStore + 'static;
}
