//! Currency request payloads.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Create currency request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCurrencyRequest {
    /// Currency symbol, e.g. `USD`.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub symbol: String,
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 chars long"))]
    pub name: String,
}

/// Delete currency request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteCurrencyRequest {
    /// Currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub symbol: String,
}

/// Set exchange rate request (`base * rate = target`).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetRateRequest {
    /// Base currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub base: String,
    /// Target currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub target: String,
    /// Exchange rate; accepts a JSON number or numeric string.
    pub rate: Decimal,
}

/// Remove exchange rate request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RemoveRateRequest {
    /// Base currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub base: String,
    /// Target currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub target: String,
}

/// Conversion request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConvertRequest {
    /// Base currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub base: String,
    /// Target currency symbol.
    #[validate(length(min = 1, max = 16, message = "must be 1 to 16 chars long"))]
    pub target: String,
    /// Amount in the base currency; accepts a JSON number or numeric string.
    pub amount: Decimal,
}
