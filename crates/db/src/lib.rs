//! PostgreSQL persistence for fxcalc.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories implementing the `fxcalc-core` store traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CurrencyRepository, RefreshTokenRepository, UserRepository};

use fxcalc_core::store::Backend;
use fxcalc_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Backend made of the PostgreSQL repositories.
#[derive(Debug, Clone, Copy)]
pub struct PostgresBackend;

impl Backend for PostgresBackend {
    type Users = UserRepository;
    type Tokens = RefreshTokenRepository;
    type Currencies = CurrencyRepository;
}

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}
