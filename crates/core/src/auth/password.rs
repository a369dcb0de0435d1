//! Password hashing with Argon2id.
//!
//! Hashes are stored in PHC string format, so the salt and cost parameters
//! travel with the hash and old hashes keep verifying after a cost change.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failures. A wrong password is not an error.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing a new password failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Verification failed for a reason other than a mismatch.
    #[error("password verification failed: {0}")]
    Verify(String),

    /// Stored hash is not a PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

fn argon2id() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
///
/// # Example
///
/// ```
/// use fxcalc_core::auth::hash_password;
///
/// let hash = hash_password("s3cret").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2id()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a plaintext password against a stored PHC hash.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` if the stored hash cannot be parsed
/// and `PasswordError::Verify` for any failure other than a mismatch.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let phc = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match argon2id().verify_password(password.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
