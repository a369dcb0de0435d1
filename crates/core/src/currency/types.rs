//! Currency domain types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currency and its outgoing exchange-rate edges.
///
/// `rates[target]` is how many units of `target` one unit of this currency
/// buys. Every currency is created with a parity edge to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Unique symbol, e.g. `USD`.
    pub symbol: String,
    /// Display name, e.g. `US Dollar`.
    pub name: String,
    /// Directed rate edges keyed by target symbol.
    pub rates: BTreeMap<String, Decimal>,
}

impl Currency {
    /// Creates a currency seeded with its self rate of 1.
    #[must_use]
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let mut rates = BTreeMap::new();
        rates.insert(symbol.clone(), Decimal::ONE);
        Self {
            symbol,
            name: name.into(),
            rates,
        }
    }

    /// Returns the direct rate to `target`, if an edge exists.
    #[must_use]
    pub fn rate_to(&self, target: &str) -> Option<Decimal> {
        self.rates.get(target).copied()
    }
}

/// Result of a currency conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Base currency symbol.
    pub base: String,
    /// Target currency symbol.
    pub target: String,
    /// Amount in the base currency.
    pub amount: Decimal,
    /// Amount in the target currency.
    pub converted_amount: Decimal,
    /// Rate used for the conversion.
    pub exchange_rate: Decimal,
}

impl Conversion {
    /// Identity conversion: same currency, rate 1.
    #[must_use]
    pub fn identity(symbol: &str, amount: Decimal) -> Self {
        Self {
            base: symbol.to_string(),
            target: symbol.to_string(),
            amount,
            converted_amount: amount,
            exchange_rate: Decimal::ONE,
        }
    }
}
