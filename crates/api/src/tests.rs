//! Router tests against the in-memory backend.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::Duration;
use fxcalc_core::store::memory::{
    MemoryBackend, MemoryCurrencyStore, MemoryTokenStore, MemoryUserStore,
};
use fxcalc_core::token::TokenPolicy;
use fxcalc_shared::{JwtConfig, JwtService};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

struct TestApp {
    router: Router,
    state: AppState<MemoryBackend>,
}

impl TestApp {
    fn new() -> Self {
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "api-test-secret".to_string(),
            access_token_ttl: Duration::minutes(15),
        }));
        let state = AppState::<MemoryBackend>::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(MemoryCurrencyStore::new()),
            jwt,
            TokenPolicy::default(),
        );
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    fn token_with(&self, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
        self.state
            .tokens
            .generate_access_token(Uuid::new_v4(), &roles)
            .unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_raw(request).await
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": "Currency Calculator Backend" }));

    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_auth_flow() {
    let app = TestApp::new();
    let credentials = json!({ "email": "user@example.com", "password": "secret" });

    let (status, body) = app
        .send("POST", "/auth/register", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "Successful registration: user@example.com");

    let (status, body) = app
        .send("POST", "/auth/register", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "user@example.com already exists.");

    let (status, body) = app
        .send("POST", "/auth/login", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["user"]["roles"], json!(["viewer"]));
    let access = body["accessToken"].as_str().unwrap().to_string();
    let refresh = body["refreshToken"].as_str().unwrap().to_string();

    let (status, body) = app.send("GET", "/currencies", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = app
        .send("POST", "/auth/refresh", None, Some(json!({ "token": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["accessToken"].is_string());

    let (status, _) = app
        .send("DELETE", "/auth/logout", None, Some(json!({ "token": refresh })))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send("DELETE", "/auth/logout", None, Some(json!({ "token": refresh })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Invalid token.");

    let (status, body) = app
        .send("POST", "/auth/refresh", None, Some(json!({ "token": refresh })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "Invalid token.");
}

#[tokio::test]
async fn test_login_failure_is_generic() {
    let app = TestApp::new();
    app.send(
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "a@example.com", "password": "secret" })),
    )
    .await;

    for body in [
        json!({ "email": "a@example.com", "password": "wrong" }),
        json!({ "email": "b@example.com", "password": "secret" }),
    ] {
        let (status, body) = app.send("POST", "/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "ok": false, "msg": "Login failed." }));
    }
}

#[tokio::test]
async fn test_missing_refresh_and_logout_tokens() {
    let app = TestApp::new();

    let (status, body) = app.send("POST", "/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "No token provided.");

    let (status, body) = app
        .send("DELETE", "/auth/logout", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "No token provided.");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "email": "user@example.com", "password": "abc" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["msg"], "Validation failed");
    assert_eq!(body["errors"][0]["path"], "password");
    assert_eq!(body["errors"][0]["msg"], "must be at least 5 chars long");
}

#[tokio::test]
async fn test_currency_guards() {
    let app = TestApp::new();
    let viewer = app.token_with(&["viewer"]);
    let new_currency = json!({ "symbol": "USD", "name": "US Dollar" });

    let (status, body) = app.send("GET", "/currencies", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "No token provided.");

    let (status, body) = app.send("GET", "/currencies", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "Invalid token.");

    let (status, body) = app
        .send("POST", "/currencies", Some(&viewer), Some(new_currency))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "Editor permissions required. Access denied.");

    let editor_only = app.token_with(&["editor"]);
    let (status, body) = app
        .send("GET", "/currencies", Some(&editor_only), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "Viewer permissions required. Access denied.");
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = TestApp::new();
    let viewer = app.token_with(&["viewer"]);

    let request = Request::builder()
        .method("GET")
        .uri("/currencies")
        .header("Authorization", format!("Bearer {viewer}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send_raw(request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_currency_flow() {
    let app = TestApp::new();
    let token = app.token_with(&["editor", "viewer"]);
    let token = Some(token.as_str());

    for (symbol, name) in [("USD", "US Dollar"), ("EUR", "Euro")] {
        let (status, body) = app
            .send(
                "POST",
                "/currencies",
                token,
                Some(json!({ "symbol": symbol, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["msg"], format!("Successfully added {symbol}"));
    }

    let (status, body) = app
        .send(
            "POST",
            "/currencies",
            token,
            Some(json!({ "symbol": "USD", "name": "Again" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["msg"], "Currency USD already exists");

    let (status, body) = app
        .send(
            "PUT",
            "/currencies/rate",
            token,
            Some(json!({ "base": "USD", "target": "EUR", "rate": "0.9" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "Successfully set exchange rate: USD -> EUR: 0.9");

    let (status, body) = app.send("GET", "/currencies", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["result"][0]["symbol"], "EUR");
    assert_eq!(decimal(&body["result"][1]["rates"]["EUR"]), dec!(0.9));

    let (status, body) = app
        .send(
            "POST",
            "/currencies/convert",
            token,
            Some(json!({ "base": "USD", "target": "EUR", "amount": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["convertedAmount"]), dec!(90));
    assert_eq!(decimal(&body["data"]["exchangeRate"]), dec!(0.9));

    let (status, _) = app
        .send(
            "DELETE",
            "/currencies/rate",
            token,
            Some(json!({ "base": "USD", "target": "EUR" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send(
            "POST",
            "/currencies/convert",
            token,
            Some(json!({ "base": "USD", "target": "EUR", "amount": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Exchange rate from US Dollar to Euro not found");

    let (status, _) = app
        .send("DELETE", "/currencies", token, Some(json!({ "symbol": "EUR" })))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send("DELETE", "/currencies", token, Some(json!({ "symbol": "EUR" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Currency EUR not found");
}

#[tokio::test]
async fn test_rate_request_errors() {
    let app = TestApp::new();
    let token = app.token_with(&["editor"]);
    let token = Some(token.as_str());

    let (status, body) = app
        .send(
            "PUT",
            "/currencies/rate",
            token,
            Some(json!({ "base": "USD", "target": "USD", "rate": "2" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Target and base should be different.");

    let (status, body) = app
        .send(
            "PUT",
            "/currencies/rate",
            token,
            Some(json!({ "base": "USD", "target": "EUR", "rate": "abc" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Validation failed");

    let (status, body) = app
        .send(
            "PUT",
            "/currencies/rate",
            token,
            Some(json!({ "base": "", "target": "EUR", "rate": "2" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "base");

    let request = Request::builder()
        .method("PUT")
        .uri("/currencies/rate")
        .header("x-auth-token", token.unwrap_or_default())
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "ok": false, "msg": "Bad request." }));
}

#[tokio::test]
async fn test_same_currency_convert_is_identity() {
    let app = TestApp::new();
    let token = app.token_with(&["viewer"]);

    let (status, body) = app
        .send(
            "POST",
            "/currencies/convert",
            Some(&token),
            Some(json!({ "base": "XYZ", "target": "XYZ", "amount": "42.5" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["convertedAmount"]), dec!(42.5));
    assert_eq!(decimal(&body["data"]["exchangeRate"]), dec!(1));
}

#[tokio::test]
async fn test_overlong_symbol_is_rejected_before_storage() {
    let app = TestApp::new();
    let token = app.token_with(&["editor"]);

    let (status, body) = app
        .send(
            "POST",
            "/currencies",
            Some(&token),
            Some(json!({ "symbol": "ABCDEFGHIJKLMNOPQ", "name": "Too Long" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Validation failed");
    assert_eq!(body["errors"][0]["path"], "symbol");

    let (_, body) = app.send("GET", "/currencies", Some(&token), None).await;
    assert_eq!(body["count"], 0);
}
