//! Refresh token records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted, opaque refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Hex-encoded random token (unique).
    pub token: String,
    /// Owning user.
    pub user_id: Uuid,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the token stops being usable.
    pub expires_at: DateTime<Utc>,
    /// Set once the token has been revoked.
    pub is_revoked: bool,
}

impl RefreshToken {
    /// Creates a fresh, unrevoked record, or `None` when `now + ttl` is
    /// past the representable range.
    #[must_use]
    pub fn issue(token: String, user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        Some(Self {
            token,
            user_id,
            created_at: now,
            expires_at: now.checked_add_signed(ttl)?,
            is_revoked: false,
        })
    }

    /// A token is usable iff it is not revoked and `now < expires_at`.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && now < self.expires_at
    }

    /// True when the cleanup sweep should delete this record: expired, or
    /// revoked and created before `revoked_before`.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, revoked_before: DateTime<Utc>) -> bool {
        self.expires_at < now || (self.is_revoked && self.created_at < revoked_before)
    }
}
