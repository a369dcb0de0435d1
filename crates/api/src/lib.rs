//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for auth and currencies
//! - Authentication middleware and role guards
//! - Request extractors
//! - Response envelope and error mapping

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use fxcalc_core::auth::AuthService;
use fxcalc_core::currency::CurrencyService;
use fxcalc_core::store::Backend;
use fxcalc_core::token::{TokenPolicy, TokenService};
use fxcalc_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct AppState<B: Backend> {
    /// Registration, login, refresh and logout.
    pub auth: Arc<AuthService<B::Users, B::Tokens>>,
    /// Access token verification and refresh token lifecycle.
    pub tokens: Arc<TokenService<B::Tokens>>,
    /// Currencies and exchange rates.
    pub currencies: Arc<CurrencyService<B::Currencies>>,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            tokens: Arc::clone(&self.tokens),
            currencies: Arc::clone(&self.currencies),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Wires the services over one set of stores.
    #[must_use]
    pub fn new(
        users: Arc<B::Users>,
        refresh_tokens: Arc<B::Tokens>,
        currencies: Arc<B::Currencies>,
        jwt: Arc<JwtService>,
        policy: TokenPolicy,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(refresh_tokens, jwt, policy));
        Self {
            auth: Arc::new(AuthService::new(users, Arc::clone(&tokens))),
            tokens,
            currencies: Arc::new(CurrencyService::new(currencies)),
        }
    }
}

/// Creates the main application router.
pub fn create_router<B: Backend>(state: AppState<B>) -> Router {
    routes::api_routes(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
