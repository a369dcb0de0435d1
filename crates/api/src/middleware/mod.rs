//! Request middleware.

pub mod auth;

pub use auth::{AUTH_TOKEN_HEADER, auth_middleware};
