//! Authentication types: JWT claims and auth request/response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Role tags granted to the user.
    pub roles: Vec<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, roles: Vec<String>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            roles,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(
        email(message = "must be a valid email"),
        length(max = 255, message = "must be at most 255 chars long")
    )]
    pub email: String,
    /// User password.
    #[validate(length(min = 5, message = "must be at least 5 chars long"))]
    pub password: String,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Refresh or logout request carrying an opaque refresh token.
///
/// The token is optional so a missing value can be answered with its own
/// status instead of a generic body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// The refresh token.
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenRequest {
    /// Returns the token if present and non-blank.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// User email.
    pub email: String,
    /// Role tags.
    pub roles: Vec<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Always true.
    pub ok: bool,
    /// Authenticated user.
    pub user: UserSummary,
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
}

/// Refresh response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Always true.
    pub ok: bool,
    /// Newly signed access token.
    pub access_token: String,
}
