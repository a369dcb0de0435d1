//! Application configuration management.
//!
//! Sources, lowest precedence first: `config/default.toml`,
//! `config/{RUN_MODE}.toml`, then `FXCALC__*` environment variables
//! (`FXCALC__JWT__ACCESS_TOKEN_SECRET` maps to `jwt.access_token_secret`).

use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::jwt::{self, JwtConfig, JwtError};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Access token signing configuration.
    pub jwt: AuthConfig,
    /// Refresh token lifecycle configuration.
    #[serde(default)]
    pub tokens: TokenConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL, or `memory` for the in-process store.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Returns true when the in-memory store was requested.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.trim().eq_ignore_ascii_case("memory")
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Access token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key for signing access tokens.
    pub access_token_secret: String,
    /// Access token lifetime, e.g. `15m`.
    #[serde(default = "default_access_token_exp")]
    pub access_token_exp: String,
    /// Secret reserved for refresh token signing. Refresh tokens are opaque,
    /// so this is only checked for presence.
    pub refresh_token_secret: String,
}

fn default_access_token_exp() -> String {
    "15m".to_string()
}

/// Refresh token lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,
    /// Revoked tokens older than this are removed by the cleanup sweep.
    #[serde(default = "default_revoked_grace_days")]
    pub revoked_grace_days: i64,
    /// Seconds between cleanup sweeps; 0 disables the sweep.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            refresh_token_expiry_days: default_refresh_token_expiry_days(),
            revoked_grace_days: default_revoked_grace_days(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

fn default_refresh_token_expiry_days() -> i64 {
    30
}

fn default_revoked_grace_days() -> i64 {
    7
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FXCALC").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()
            .map_err(config::ConfigError::Message)?;
        Ok(app)
    }

    /// Checks required values and formats.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        require_non_blank("database.url", &self.database.url)?;
        require_non_blank("jwt.access_token_secret", &self.jwt.access_token_secret)?;
        require_non_blank("jwt.refresh_token_secret", &self.jwt.refresh_token_secret)?;
        jwt::parse_expiry(&self.jwt.access_token_exp).map_err(|e| e.to_string())?;

        if self.tokens.refresh_token_expiry_days <= 0 {
            return Err("tokens.refresh_token_expiry_days must be positive".to_string());
        }
        if self.tokens.revoked_grace_days < 0 {
            return Err("tokens.revoked_grace_days must not be negative".to_string());
        }
        let now = Utc::now();
        let refresh_expiry = Duration::try_days(self.tokens.refresh_token_expiry_days)
            .and_then(|ttl| now.checked_add_signed(ttl));
        if refresh_expiry.is_none() {
            return Err("tokens.refresh_token_expiry_days is out of range".to_string());
        }
        let revoked_cutoff = Duration::try_days(self.tokens.revoked_grace_days)
            .and_then(|grace| now.checked_sub_signed(grace));
        if revoked_cutoff.is_none() {
            return Err("tokens.revoked_grace_days is out of range".to_string());
        }
        Ok(())
    }

    /// Builds the JWT signing configuration.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidExpiry` if `jwt.access_token_exp` is malformed.
    pub fn jwt_config(&self) -> Result<JwtConfig, JwtError> {
        JwtConfig::from_expiry(
            self.jwt.access_token_secret.trim(),
            &self.jwt.access_token_exp,
        )
    }
}

fn require_non_blank(name: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("Missing required configuration value: {name}"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
