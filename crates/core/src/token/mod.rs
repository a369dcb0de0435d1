//! Access token signing and refresh token lifecycle.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::TokenError;
pub use service::{REFRESH_TOKEN_BYTES, TokenPolicy, TokenService};
pub use types::RefreshToken;
