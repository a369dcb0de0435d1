//! Authentication middleware for protected routes.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use fxcalc_core::store::Backend;
use fxcalc_shared::AppError;
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Header carrying the access token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Reads the access token from `x-auth-token`, falling back to `Authorization: Bearer`.
fn access_token(headers: &HeaderMap) -> Option<&str> {
    let from_header = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());
    let from_bearer = || {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token)
    };

    from_header
        .or_else(from_bearer)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware that validates access tokens.
///
/// On success the verified claims are stored in request extensions, where
/// the `Authorized` extractor checks roles.
pub async fn auth_middleware<B: Backend>(
    State(state): State<AppState<B>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = access_token(request.headers()) else {
        return ApiError::from(AppError::Unauthorized("No token provided.".to_string()))
            .into_response();
    };

    match state.tokens.verify_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected access token");
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_custom_header_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("from-header"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));

        assert_eq!(access_token(&headers), Some("from-header"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(access_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(access_token(&headers), None);
    }

    #[test]
    fn test_blank_token_is_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("  "));
        assert_eq!(access_token(&headers), None);
    }
}
