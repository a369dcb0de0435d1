//! Token service: access token signing and the refresh token lifecycle.

use std::sync::Arc;

use chrono::{Duration, Utc};
use fxcalc_shared::config::TokenConfig;
use fxcalc_shared::{Claims, JwtService};
use rand::RngCore;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::TokenError;
use super::types::RefreshToken;
use crate::store::RefreshTokenStore;

/// Number of random bytes in a refresh token (hex-encoded to 80 chars).
pub const REFRESH_TOKEN_BYTES: usize = 40;

/// Refresh token lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// How long a refresh token stays usable.
    pub refresh_token_ttl: Duration,
    /// Revoked tokens older than this are removed by cleanup.
    pub revoked_grace: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            refresh_token_ttl: Duration::days(30),
            revoked_grace: Duration::days(7),
        }
    }
}

impl TryFrom<&TokenConfig> for TokenPolicy {
    type Error = TokenError;

    fn try_from(config: &TokenConfig) -> Result<Self, Self::Error> {
        let days = |name: &str, value: i64| {
            Duration::try_days(value)
                .ok_or_else(|| TokenError::LifetimeOutOfRange(format!("{name} = {value}")))
        };
        Ok(Self {
            refresh_token_ttl: days("tokens.refresh_token_expiry_days", config.refresh_token_expiry_days)?,
            revoked_grace: days("tokens.revoked_grace_days", config.revoked_grace_days)?,
        })
    }
}

/// Issues, validates, revokes and garbage-collects credentials.
pub struct TokenService<R: RefreshTokenStore> {
    repo: Arc<R>,
    jwt: Arc<JwtService>,
    policy: TokenPolicy,
}

impl<R: RefreshTokenStore> TokenService<R> {
    /// Creates a new token service.
    #[must_use]
    pub fn new(repo: Arc<R>, jwt: Arc<JwtService>, policy: TokenPolicy) -> Self {
        Self { repo, jwt, policy }
    }

    /// Signs a short-lived access token embedding the user id and roles.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails or the expiry is out
    /// of range.
    pub fn generate_access_token(&self, user_id: Uuid, roles: &[String]) -> Result<String, TokenError> {
        self.jwt
            .generate_access_token(user_id, roles)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidToken` for any verification failure,
    /// expired tokens included.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.jwt.validate_token(token).map_err(|e| {
            debug!(error = %e, "Access token rejected");
            TokenError::InvalidToken
        })
    }

    /// Generates a new random, hex-encoded refresh token string.
    #[must_use]
    pub fn generate_refresh_token() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Creates and persists a refresh token for a user.
    ///
    /// A collision is rejected by the store's unique constraint and surfaces
    /// as a store error; there is no retry.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::LifetimeOutOfRange` if the expiry cannot be
    /// represented, or `TokenError::Store` if the insert fails.
    pub async fn create_refresh_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        let token = Self::generate_refresh_token();
        let ttl = self.policy.refresh_token_ttl;
        let record = RefreshToken::issue(token.clone(), user_id, Utc::now(), ttl)
            .ok_or_else(|| TokenError::LifetimeOutOfRange(format!("refresh token ttl {ttl}")))?;
        self.repo.insert(record).await?;
        Ok(token)
    }

    /// Returns the owning user of a usable refresh token.
    ///
    /// Unknown, expired and revoked tokens all yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Store` if the lookup fails.
    pub async fn validate_refresh_token(&self, token: &str) -> Result<Option<Uuid>, TokenError> {
        let record = self.repo.find_usable(token, Utc::now()).await?;
        Ok(record.map(|r| r.user_id))
    }

    /// Revokes a single refresh token. Returns false if it was absent or
    /// already revoked.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Store` if the update fails.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<bool, TokenError> {
        Ok(self.repo.revoke(token).await?)
    }

    /// Revokes every active refresh token a user holds.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Store` if the update fails.
    pub async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<u64, TokenError> {
        let revoked = self.repo.revoke_all_for_user(user_id).await?;
        info!(user_id = %user_id, revoked, "Revoked all refresh tokens for user");
        Ok(revoked)
    }

    /// Deletes expired tokens and revoked tokens past the grace window.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Store` if the delete fails.
    pub async fn cleanup_expired_tokens(&self) -> Result<u64, TokenError> {
        let now = Utc::now();
        let grace = self.policy.revoked_grace;
        let revoked_before = now
            .checked_sub_signed(grace)
            .ok_or_else(|| TokenError::LifetimeOutOfRange(format!("revoked grace {grace}")))?;
        let deleted = self.repo.delete_stale(now, revoked_before).await?;
        info!(deleted, "Refresh token cleanup finished");
        Ok(deleted)
    }
}
