//! Currency service: currency lifecycle and the symmetric rate graph.
//!
//! Every rate edge `A -> B = r` is written together with its inverse
//! `B -> A = 1/r`. The two writes are independent single-record updates;
//! a failure between them can leave one side behind.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::CurrencyError;
use super::types::{Conversion, Currency};
use crate::store::{CurrencyStore, StoreError};

/// Currency service backed by a [`CurrencyStore`].
pub struct CurrencyService<R: CurrencyStore> {
    repo: Arc<R>,
}

impl<R: CurrencyStore> CurrencyService<R> {
    /// Creates a new currency service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Lists every currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Store` if the scan fails.
    pub async fn get_all_currencies(&self) -> Result<Vec<Currency>, CurrencyError> {
        Ok(self.repo.list().await?)
    }

    /// Finds a currency by exact symbol.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Store` if the lookup fails.
    pub async fn find_currency_by_symbol(&self, symbol: &str) -> Result<Option<Currency>, CurrencyError> {
        Ok(self.repo.find(symbol).await?)
    }

    /// Returns the currency or fails with `CurrencyNotFound`.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::CurrencyNotFound` if no currency has this symbol.
    pub async fn validate_currency_exists(&self, symbol: &str) -> Result<Currency, CurrencyError> {
        self.find_currency_by_symbol(symbol)
            .await?
            .ok_or_else(|| CurrencyError::CurrencyNotFound(symbol.to_string()))
    }

    /// Creates a currency with its self rate of 1.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::CurrencyAlreadyExists` if the symbol is taken.
    pub async fn create_currency(&self, symbol: &str, name: &str) -> Result<Currency, CurrencyError> {
        if self.find_currency_by_symbol(symbol).await?.is_some() {
            return Err(CurrencyError::CurrencyAlreadyExists(symbol.to_string()));
        }

        let currency = self
            .repo
            .insert(Currency::new(symbol, name))
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => CurrencyError::CurrencyAlreadyExists(symbol.to_string()),
                other => CurrencyError::Store(other),
            })?;

        info!(symbol = %currency.symbol, name = %currency.name, "Currency created");
        Ok(currency)
    }

    /// Deletes a currency and strips every inbound rate edge to it.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::CurrencyNotFound` if nothing was deleted.
    pub async fn delete_currency(&self, symbol: &str) -> Result<(), CurrencyError> {
        if !self.repo.delete(symbol).await? {
            return Err(CurrencyError::CurrencyNotFound(symbol.to_string()));
        }

        let stripped = self.repo.strip_rate_everywhere(symbol).await?;
        info!(symbol, stripped, "Currency deleted");
        Ok(())
    }

    /// Sets `base -> target = rate` and `target -> base = 1/rate`.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::SameCurrency` if `base == target`,
    /// `CurrencyError::InvalidRate` if `rate <= 0`, and
    /// `CurrencyError::CurrencyNotFound` if either currency is missing.
    pub async fn set_exchange_rate(
        &self,
        base: &str,
        target: &str,
        rate: Decimal,
    ) -> Result<(), CurrencyError> {
        if base == target {
            return Err(CurrencyError::SameCurrency);
        }
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate(rate));
        }
        let inverse = Decimal::ONE
            .checked_div(rate)
            .ok_or(CurrencyError::InvalidRate(rate))?;

        tokio::try_join!(
            self.validate_currency_exists(base),
            self.validate_currency_exists(target),
        )?;

        let (forward, backward) = tokio::try_join!(
            self.repo.set_rate(base, target, rate),
            self.repo.set_rate(target, base, inverse),
        )?;
        // A side that vanished mid-update must not keep an edge pointing at it.
        if !backward {
            self.repo.unset_rate(base, target).await?;
        }
        if !forward {
            self.repo.unset_rate(target, base).await?;
        }
        ensure_written(forward, base)?;
        ensure_written(backward, target)?;

        info!(base, target, rate = %rate, inverse = %inverse, "Exchange rate set");
        Ok(())
    }

    /// Removes `base -> target` and `target -> base`.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::SameCurrency` if `base == target`,
    /// `CurrencyError::CurrencyNotFound` if either currency is missing, and
    /// `CurrencyError::ExchangeRateNotFound` if `base` has no edge to `target`.
    pub async fn remove_exchange_rate(&self, base: &str, target: &str) -> Result<(), CurrencyError> {
        if base == target {
            return Err(CurrencyError::SameCurrency);
        }

        let (from, to) = tokio::try_join!(
            self.validate_currency_exists(base),
            self.validate_currency_exists(target),
        )?;

        if from.rate_to(target).is_none() {
            return Err(CurrencyError::ExchangeRateNotFound {
                from: from.name,
                to: to.name,
            });
        }

        let (forward, backward) = tokio::try_join!(
            self.repo.unset_rate(base, target),
            self.repo.unset_rate(target, base),
        )?;
        ensure_written(forward, base)?;
        ensure_written(backward, target)?;

        info!(base, target, "Exchange rate removed");
        Ok(())
    }

    /// Converts `amount` of `base` into `target` using the direct edge only.
    ///
    /// Same-symbol conversion returns the amount at rate 1 without touching
    /// the store, even for unknown symbols.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::CurrencyNotFound` if either currency is
    /// missing and `CurrencyError::ExchangeRateNotFound` if there is no
    /// direct `base -> target` edge.
    pub async fn convert_currency(
        &self,
        base: &str,
        target: &str,
        amount: Decimal,
    ) -> Result<Conversion, CurrencyError> {
        if base == target {
            return Ok(Conversion::identity(base, amount));
        }

        let (from, to) = tokio::try_join!(
            self.validate_currency_exists(base),
            self.validate_currency_exists(target),
        )?;

        let Some(exchange_rate) = from.rate_to(target) else {
            return Err(CurrencyError::ExchangeRateNotFound {
                from: from.name,
                to: to.name,
            });
        };

        let converted_amount = amount
            .checked_mul(exchange_rate)
            .ok_or(CurrencyError::AmountOutOfRange(amount))?;

        Ok(Conversion {
            base: base.to_string(),
            target: target.to_string(),
            amount,
            converted_amount,
            exchange_rate,
        })
    }
}

/// A rate write that matched no record means the currency vanished after
/// the existence check.
fn ensure_written(matched: bool, symbol: &str) -> Result<(), CurrencyError> {
    if matched {
        Ok(())
    } else {
        warn!(symbol, "Currency disappeared during rate update");
        Err(CurrencyError::CurrencyNotFound(symbol.to_string()))
    }
}
