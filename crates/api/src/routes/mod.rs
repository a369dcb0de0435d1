//! API route definitions.

use axum::{Router, middleware};
use fxcalc_core::store::Backend;

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod currencies;
pub mod health;

/// Creates the API router; currency routes sit behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes<B: Backend>(state: AppState<B>) -> Router<AppState<B>> {
    let protected_routes = currencies::routes::<B>().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware::<B>,
    ));

    Router::new()
        .merge(health::routes::<B>())
        .merge(auth::routes::<B>())
        .merge(protected_routes)
}
