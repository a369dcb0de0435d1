//! JWT access token generation and validation.
//!
//! Access tokens are HS256-signed and carry the user id and role tags.
//! Refresh tokens are opaque and store-backed; they never pass through here.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing access tokens.
    pub secret: String,
    /// Access token lifetime.
    pub access_token_ttl: Duration,
}

impl JwtConfig {
    /// Builds a configuration from a secret and an expiry string such as `"15m"`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidExpiry` if the expiry string cannot be parsed.
    pub fn from_expiry(secret: impl Into<String>, expiry: &str) -> Result<Self, JwtError> {
        Ok(Self {
            secret: secret.into(),
            access_token_ttl: parse_expiry(expiry)?,
        })
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Expiry string is malformed.
    #[error("invalid expiry '{0}': expected <number><s|m|h|d>")]
    InvalidExpiry(String),
}

/// Parses an expiry string of the form `<number><unit>`.
///
/// Units: `s` seconds, `m` minutes, `h` hours, `d` days. A bare number is
/// read as seconds. The lifetime must fit when added to the current time.
///
/// # Errors
///
/// Returns `JwtError::InvalidExpiry` for empty, zero, malformed or
/// out-of-range input.
pub fn parse_expiry(raw: &str) -> Result<Duration, JwtError> {
    let value = raw.trim();
    let invalid = || JwtError::InvalidExpiry(raw.to_string());

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    };
    duration
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(invalid)
}

/// JWT service for access token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_ttl", &self.config.access_token_ttl)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a signed access token carrying the user id and roles.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if the expiry is out of range or
    /// token generation fails.
    pub fn generate_access_token(&self, user_id: Uuid, roles: &[String]) -> Result<String, JwtError> {
        let ttl = self.config.access_token_ttl;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::EncodingError(format!("expiry out of range: {ttl}")))?;
        let claims = Claims::new(user_id, roles.to_vec(), expires_at);
        self.sign(&claims)
    }

    /// Signs arbitrary claims with the configured secret.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes an access token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or the
    /// signature does not match.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
