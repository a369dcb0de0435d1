//! Registration, login, refresh and logout.

use std::sync::{Arc, LazyLock};

use tokio::task;
use tracing::{info, warn};

use super::error::AuthError;
use super::password::{PasswordError, hash_password, verify_password};
use super::role::Role;
use super::types::{NewUser, User};
use crate::store::{RefreshTokenStore, StoreError, UserStore};
use crate::token::TokenService;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 5;

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.contains('@')
        }
        None => false,
    }
}

/// Verified against when the email is unknown so a miss costs as much as a
/// wrong password.
static UNKNOWN_USER_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-user-placeholder").ok());

async fn verify_against_placeholder(candidate: String) {
    let _ = task::spawn_blocking(move || {
        UNKNOWN_USER_HASH
            .as_deref()
            .map(|hash| verify_password(&candidate, hash))
    })
    .await;
}

/// Tokens issued by a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated user.
    pub user: User,
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
}

/// Authentication service composing the user store and the token service.
pub struct AuthService<U: UserStore, T: RefreshTokenStore> {
    users: Arc<U>,
    tokens: Arc<TokenService<T>>,
}

impl<U: UserStore, T: RefreshTokenStore> AuthService<U, T> {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(users: Arc<U>, tokens: Arc<TokenService<T>>) -> Self {
        Self { users, tokens }
    }

    /// Lower-cases and trims an email for storage and lookup.
    #[must_use]
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Registers a user with the default `viewer` role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a malformed email or short password and
    /// `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Self::normalize_email(email);
        if !is_plausible_email(&email) {
            return Err(AuthError::Validation(format!("{email} is not a valid email")));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} chars long"
            )));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken(email));
        }

        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))??;

        let user = self
            .users
            .insert(NewUser {
                email: email.clone(),
                password_hash,
                roles: vec![Role::DEFAULT.tag().to_string()],
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::EmailTaken(email),
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, a wrong
    /// password, or an unreadable stored hash.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = Self::normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_against_placeholder(password.to_string()).await;
            info!(email = %email, "Login attempt for non-existent user");
            return Err(AuthError::InvalidCredentials);
        };

        let candidate = password.to_string();
        let stored = user.password_hash.clone();
        let verified = task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| PasswordError::Verify(e.to_string()))?;

        match verified {
            Ok(true) => {}
            Ok(false) => {
                info!(user_id = %user.id, "Failed login attempt - invalid password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Stored password hash unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let access_token = self.tokens.generate_access_token(user.id, &user.roles)?;
        let refresh_token = self.tokens.create_refresh_token(user.id).await?;

        info!(user_id = %user.id, "User logged in successfully");
        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Roles are reloaded from the store, so role changes apply on refresh.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is not usable and
    /// `AuthError::OrphanedToken` if its user no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let Some(user_id) = self.tokens.validate_refresh_token(refresh_token).await? else {
            return Err(AuthError::InvalidToken);
        };
        let Some(user) = self.users.find_by_id(user_id).await? else {
            warn!(user_id = %user_id, "Refresh token belongs to a missing user");
            return Err(AuthError::OrphanedToken);
        };

        Ok(self.tokens.generate_access_token(user.id, &user.roles)?)
    }

    /// Adds a role to the user registered under `email`, keeping existing
    /// tags. Granting a role the user already holds changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUser` if no user has that email.
    pub async fn grant_role(&self, email: &str, role: Role) -> Result<User, AuthError> {
        let email = Self::normalize_email(email);
        let Some(mut user) = self.users.find_by_email(&email).await? else {
            return Err(AuthError::UnknownUser(email));
        };
        if role.is_granted_to(&user.roles) {
            return Ok(user);
        }

        user.roles.push(role.tag().to_string());
        if !self.users.set_roles(user.id, user.roles.clone()).await? {
            return Err(AuthError::UnknownUser(email));
        }

        info!(user_id = %user.id, role = %role, "Role granted");
        Ok(user)
    }

    /// Revokes a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotRevocable` if the token is unknown or already revoked.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        if self.tokens.revoke_refresh_token(refresh_token).await? {
            Ok(())
        } else {
            Err(AuthError::NotRevocable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_hash_is_verifiable() {
        let hash = UNKNOWN_USER_HASH.as_deref().unwrap();
        assert!(!verify_password("secret", hash).unwrap());
    }
}
