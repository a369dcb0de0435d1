//! Shared types, errors, and configuration for fxcalc.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error type with HTTP status mapping
//! - Configuration management
//! - JWT access token signing and verification
//! - Request and response payloads

pub mod auth;
pub mod config;
pub mod currency;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
