//! User records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Unique, normalized email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Role tags, e.g. `["viewer"]`.
    pub roles: Vec<String>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Role tags.
    pub roles: Vec<String>,
}

impl NewUser {
    /// Assigns an ID, producing the stored record.
    #[must_use]
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            roles: self.roles,
        }
    }
}
