//! Authentication: users, roles, password hashing and the login flow.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Role tags with exact-match membership
//! - `AuthService` for register/login/refresh/logout

mod password;

pub mod error;
pub mod role;
pub mod service;
pub mod types;


pub use error::{AuthError, INVALID_TOKEN, LOGIN_FAILED};
pub use password::{PasswordError, hash_password, verify_password};
pub use role::Role;
pub use service::{AuthService, LoginOutcome, MIN_PASSWORD_LEN};
pub use types::{NewUser, User};
