//! Currencies and their directed exchange-rate edges.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::CurrencyError;
pub use service::CurrencyService;
pub use types::{Conversion, Currency};
