//! Authentication routes for register, login, token refresh and logout.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
};
use fxcalc_core::store::Backend;
use fxcalc_shared::AppError;
use fxcalc_shared::auth::{
    LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, TokenRequest, UserSummary,
};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::response;

/// Creates the auth router.
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        .route("/auth/register", post(register::<B>))
        .route("/auth/login", post(login::<B>))
        .route("/auth/refresh", post(refresh::<B>))
        .route("/auth/logout", delete(logout::<B>))
}

/// Reads `token` from an optional JSON body. A missing body counts as a missing token.
fn body_token(body: Result<Json<TokenRequest>, JsonRejection>) -> Result<Option<String>, ApiError> {
    match body {
        Ok(Json(req)) => Ok(req.token().map(str::to_string)),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(None),
        Err(rejection) => Err(rejection.into()),
    }
}

/// POST /auth/register - Create a viewer account.
async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Response, ApiError> {
    let user = state.auth.register(&payload.email, &payload.password).await?;
    Ok(response::created(format!(
        "Successful registration: {}",
        user.email
    )))
}

/// POST /auth/login - Authenticate and return an access/refresh token pair.
async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        ok: true,
        user: UserSummary {
            email: outcome.user.email,
            roles: outcome.user.roles,
        },
        access_token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    })
    .into_response())
}

/// POST /auth/refresh - Exchange a refresh token for a new access token.
async fn refresh<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Some(token) = body_token(body)? else {
        return Err(AppError::Unauthorized("No token provided.".to_string()).into());
    };

    let access_token = state.auth.refresh(&token).await?;
    Ok(Json(RefreshResponse {
        ok: true,
        access_token,
    })
    .into_response())
}

/// DELETE /auth/logout - Revoke a refresh token.
async fn logout<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Some(token) = body_token(body)? else {
        return Ok(response::error(StatusCode::BAD_REQUEST, "No token provided."));
    };

    state.auth.logout(&token).await?;
    info!("Refresh token revoked on logout");
    Ok(response::no_content())
}
