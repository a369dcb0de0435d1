//! Root and health check endpoints.

use axum::{Json, Router, routing::get};
use fxcalc_core::store::Backend;
use serde::Serialize;
use serde_json::{Value, json};

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

async fn root() -> Json<Value> {
    Json(json!({ "msg": "Currency Calculator Backend" }))
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates root and health check routes.
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
