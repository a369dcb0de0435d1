//! Currency repository for database operations.
//!
//! Rate edits are single `UPDATE` statements on the `rates` JSONB column,
//! so each edge write is atomic on its row without a read-modify-write.

use std::collections::BTreeMap;

use fxcalc_core::currency::Currency;
use fxcalc_core::store::{CurrencyStore, StoreError};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryOrder,
    Set, Statement,
};
use tracing::debug;

use super::{backend_error, store_error};
use crate::entities::currencies;

const SET_RATE_SQL: &str = r"
UPDATE currencies
SET rates = jsonb_set(rates, ARRAY[$2::text], to_jsonb($3::text), true)
WHERE symbol = $1
";

const UNSET_RATE_SQL: &str = r"
UPDATE currencies
SET rates = rates - $2::text
WHERE symbol = $1
";

const STRIP_RATE_SQL: &str = r"
UPDATE currencies
SET rates = rates - $1::text
WHERE rates ->> $1::text IS NOT NULL
";

/// Currency repository.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn execute(&self, sql: &str, values: Vec<sea_orm::Value>) -> Result<u64, StoreError> {
        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                values,
            ))
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected())
    }
}

fn into_currency(model: currencies::Model) -> Result<Currency, StoreError> {
    let rates: BTreeMap<String, Decimal> = serde_json::from_value(model.rates).map_err(|e| {
        StoreError::Backend(format!("corrupt rates for {}: {e}", model.symbol))
    })?;

    Ok(Currency {
        symbol: model.symbol,
        name: model.name,
        rates,
    })
}

impl CurrencyStore for CurrencyRepository {
    async fn list(&self) -> Result<Vec<Currency>, StoreError> {
        currencies::Entity::find()
            .order_by_asc(currencies::Column::Symbol)
            .all(&self.db)
            .await
            .map_err(backend_error)?
            .into_iter()
            .map(into_currency)
            .collect()
    }

    async fn find(&self, symbol: &str) -> Result<Option<Currency>, StoreError> {
        currencies::Entity::find_by_id(symbol.to_string())
            .one(&self.db)
            .await
            .map_err(backend_error)?
            .map(into_currency)
            .transpose()
    }

    async fn insert(&self, currency: Currency) -> Result<Currency, StoreError> {
        let rates = serde_json::to_value(&currency.rates)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let model = currencies::ActiveModel {
            symbol: Set(currency.symbol.clone()),
            name: Set(currency.name),
            rates: Set(rates),
        }
        .insert(&self.db)
        .await
        .map_err(|e| store_error(e, &currency.symbol))?;

        into_currency(model)
    }

    async fn delete(&self, symbol: &str) -> Result<bool, StoreError> {
        let result = currencies::Entity::delete_by_id(symbol.to_string())
            .exec(&self.db)
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected > 0)
    }

    async fn set_rate(&self, symbol: &str, target: &str, rate: Decimal) -> Result<bool, StoreError> {
        let affected = self
            .execute(
                SET_RATE_SQL,
                vec![symbol.into(), target.into(), rate.to_string().into()],
            )
            .await?;

        Ok(affected > 0)
    }

    async fn unset_rate(&self, symbol: &str, target: &str) -> Result<bool, StoreError> {
        let affected = self
            .execute(UNSET_RATE_SQL, vec![symbol.into(), target.into()])
            .await?;

        Ok(affected > 0)
    }

    async fn strip_rate_everywhere(&self, target: &str) -> Result<u64, StoreError> {
        let affected = self.execute(STRIP_RATE_SQL, vec![target.into()]).await?;
        debug!(target_symbol = %target, currencies = affected, "Stripped rate edges");
        Ok(affected)
    }
}
