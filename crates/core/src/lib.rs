//! # fxcalc-core
//!
//! Business logic for the currency calculator: the token lifecycle, user
//! authentication, and the currency/exchange-rate graph.
//!
//! This crate has no web or database dependencies. Persistence goes through
//! the traits in [`store`]; an in-memory implementation lives in
//! [`store::memory`] and the Postgres one in `fxcalc-db`.

pub mod auth;
pub mod currency;
pub mod store;
pub mod token;
