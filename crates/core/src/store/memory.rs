//! In-process stores backed by `DashMap`.
//!
//! Every operation touches one shard lock at a time, which gives the same
//! single-record atomicity the PostgreSQL stores provide.

use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Backend, CurrencyStore, RefreshTokenStore, StoreError, UserStore};
use crate::auth::{NewUser, User};
use crate::currency::Currency;
use crate::token::RefreshToken;

/// Backend made of the in-memory stores.
#[derive(Debug, Clone, Copy)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    type Users = MemoryUserStore;
    type Tokens = MemoryTokenStore;
    type Currencies = MemoryCurrencyStore;
}

/// In-memory user store with a unique email index.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    by_id: DashMap<Uuid, User>,
    by_email: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(user.email)),
            Entry::Vacant(slot) => {
                let id = Uuid::now_v7();
                let user = user.into_user(id);
                self.by_id.insert(id, user.clone());
                slot.insert(id);
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.by_email.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.by_id.get(&id).map(|u| u.clone()))
    }

    async fn set_roles(&self, id: Uuid, roles: Vec<String>) -> Result<bool, StoreError> {
        Ok(match self.by_id.get_mut(&id) {
            Some(mut user) => {
                user.roles = roles;
                true
            }
            None => false,
        })
    }
}

/// In-memory refresh token store keyed by token.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, RefreshToken>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, revoked or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns a copy of the stored record, regardless of state.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<RefreshToken> {
        self.tokens.get(token).map(|t| t.clone())
    }
}

impl RefreshTokenStore for MemoryTokenStore {
    async fn insert(&self, token: RefreshToken) -> Result<(), StoreError> {
        match self.tokens.entry(token.token.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate("refresh token".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(token);
                Ok(())
            }
        }
    }

    async fn find_usable(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self
            .tokens
            .get(token)
            .filter(|t| t.is_usable(now))
            .map(|t| t.clone()))
    }

    async fn revoke(&self, token: &str) -> Result<bool, StoreError> {
        Ok(match self.tokens.get_mut(token) {
            Some(mut record) if !record.is_revoked => {
                record.is_revoked = true;
                true
            }
            _ => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut changed = 0;
        for mut record in self.tokens.iter_mut() {
            if record.user_id == user_id && !record.is_revoked {
                record.is_revoked = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete_stale(
        &self,
        now: DateTime<Utc>,
        revoked_before: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut deleted = 0;
        self.tokens.retain(|_, record| {
            let stale = record.is_stale(now, revoked_before);
            if stale {
                deleted += 1;
            }
            !stale
        });
        Ok(deleted)
    }
}

/// In-memory currency store keyed by symbol.
#[derive(Debug, Default)]
pub struct MemoryCurrencyStore {
    currencies: DashMap<String, Currency>,
}

impl MemoryCurrencyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CurrencyStore for MemoryCurrencyStore {
    async fn list(&self) -> Result<Vec<Currency>, StoreError> {
        let mut all: Vec<Currency> = self.currencies.iter().map(|c| c.value().clone()).collect();
        all.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(all)
    }

    async fn find(&self, symbol: &str) -> Result<Option<Currency>, StoreError> {
        Ok(self.currencies.get(symbol).map(|c| c.clone()))
    }

    async fn insert(&self, currency: Currency) -> Result<Currency, StoreError> {
        match self.currencies.entry(currency.symbol.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(currency.symbol)),
            Entry::Vacant(slot) => {
                slot.insert(currency.clone());
                Ok(currency)
            }
        }
    }

    async fn delete(&self, symbol: &str) -> Result<bool, StoreError> {
        Ok(self.currencies.remove(symbol).is_some())
    }

    async fn set_rate(&self, symbol: &str, target: &str, rate: Decimal) -> Result<bool, StoreError> {
        Ok(match self.currencies.get_mut(symbol) {
            Some(mut currency) => {
                currency.rates.insert(target.to_string(), rate);
                true
            }
            None => false,
        })
    }

    async fn unset_rate(&self, symbol: &str, target: &str) -> Result<bool, StoreError> {
        Ok(match self.currencies.get_mut(symbol) {
            Some(mut currency) => {
                currency.rates.remove(target);
                true
            }
            None => false,
        })
    }

    async fn strip_rate_everywhere(&self, target: &str) -> Result<u64, StoreError> {
        let mut changed = 0;
        for mut currency in self.currencies.iter_mut() {
            if currency.rates.remove(target).is_some() {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
