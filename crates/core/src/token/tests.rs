//! Token service tests against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use fxcalc_shared::{AppError, JwtConfig, JwtService};
use uuid::Uuid;

use super::*;
use crate::store::RefreshTokenStore;
use crate::store::memory::MemoryTokenStore;

fn service() -> (TokenService<MemoryTokenStore>, Arc<MemoryTokenStore>) {
    service_with(TokenPolicy::default())
}

fn service_with(policy: TokenPolicy) -> (TokenService<MemoryTokenStore>, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let jwt = Arc::new(JwtService::new(JwtConfig {
        secret: "token-service-test-secret".to_string(),
        access_token_ttl: Duration::minutes(15),
    }));
    (TokenService::new(store.clone(), jwt, policy), store)
}

#[test]
fn test_refresh_token_is_80_hex_chars_and_random() {
    let a = TokenService::<MemoryTokenStore>::generate_refresh_token();
    let b = TokenService::<MemoryTokenStore>::generate_refresh_token();

    assert_eq!(a.len(), REFRESH_TOKEN_BYTES * 2);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[test]
fn test_access_token_roundtrip() {
    let (service, _) = service();
    let user_id = Uuid::new_v4();
    let roles = vec!["editor".to_string()];

    let token = service.generate_access_token(user_id, &roles).unwrap();
    let claims = service.verify_access_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.roles, roles);
}

#[test]
fn test_bad_access_token_is_invalid() {
    let (service, _) = service();
    let result = service.verify_access_token("not-a-jwt");
    assert!(matches!(result, Err(TokenError::InvalidToken)));
}

#[tokio::test]
async fn test_create_persists_record_with_thirty_day_expiry() {
    let (service, store) = service();
    let user_id = Uuid::new_v4();

    let token = service.create_refresh_token(user_id).await.unwrap();
    let record = store.get(&token).unwrap();

    assert_eq!(record.user_id, user_id);
    assert!(!record.is_revoked);
    assert_eq!(record.expires_at - record.created_at, Duration::days(30));
}

#[tokio::test]
async fn test_refresh_token_lifecycle() {
    let (service, _) = service();
    let user_id = Uuid::new_v4();

    let token = service.create_refresh_token(user_id).await.unwrap();
    assert_eq!(
        service.validate_refresh_token(&token).await.unwrap(),
        Some(user_id)
    );

    assert!(service.revoke_refresh_token(&token).await.unwrap());
    assert!(!service.revoke_refresh_token(&token).await.unwrap());
    assert_eq!(service.validate_refresh_token(&token).await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let (service, _) = service();
    assert_eq!(
        service.validate_refresh_token("deadbeef").await.unwrap(),
        None
    );
    assert!(!service.revoke_refresh_token("deadbeef").await.unwrap());
}

#[tokio::test]
async fn test_expired_token_is_not_found() {
    let (service, store) = service();
    let user_id = Uuid::new_v4();
    let issued = Utc::now() - Duration::days(31);
    store
        .insert(RefreshToken::issue(
            "expired".into(),
            user_id,
            issued,
            Duration::days(30),
        ).unwrap())
        .await
        .unwrap();

    assert_eq!(service.validate_refresh_token("expired").await.unwrap(), None);
}

#[tokio::test]
async fn test_revoke_all_user_tokens() {
    let (service, _) = service();
    let user_id = Uuid::new_v4();
    let other = Uuid::new_v4();

    let first = service.create_refresh_token(user_id).await.unwrap();
    let second = service.create_refresh_token(user_id).await.unwrap();
    let third = service.create_refresh_token(user_id).await.unwrap();
    let others = service.create_refresh_token(other).await.unwrap();
    service.revoke_refresh_token(&third).await.unwrap();

    assert_eq!(service.revoke_all_user_tokens(user_id).await.unwrap(), 2);
    assert_eq!(service.validate_refresh_token(&first).await.unwrap(), None);
    assert_eq!(service.validate_refresh_token(&second).await.unwrap(), None);
    assert_eq!(
        service.validate_refresh_token(&others).await.unwrap(),
        Some(other)
    );
}

#[tokio::test]
async fn test_cleanup_removes_expired_and_old_revoked_only() {
    let (service, store) = service();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    // Expired.
    store
        .insert(RefreshToken::issue(
            "expired".into(),
            user_id,
            now - Duration::days(40),
            Duration::days(30),
        ).unwrap())
        .await
        .unwrap();
    // Revoked ten days ago, still within expiry.
    let mut old_revoked =
        RefreshToken::issue("old-revoked".into(), user_id, now - Duration::days(10), Duration::days(30)).unwrap();
    old_revoked.is_revoked = true;
    store.insert(old_revoked).await.unwrap();
    // Revoked yesterday: inside the grace window.
    let mut recent_revoked =
        RefreshToken::issue("recent-revoked".into(), user_id, now - Duration::days(1), Duration::days(30)).unwrap();
    recent_revoked.is_revoked = true;
    store.insert(recent_revoked).await.unwrap();
    // Healthy.
    let live = service.create_refresh_token(user_id).await.unwrap();

    assert_eq!(service.cleanup_expired_tokens().await.unwrap(), 2);
    assert!(store.get("expired").is_none());
    assert!(store.get("old-revoked").is_none());
    assert!(store.get("recent-revoked").is_some());
    assert_eq!(
        service.validate_refresh_token(&live).await.unwrap(),
        Some(user_id)
    );
    assert_eq!(store.len(), 2);
}

#[test]
fn test_token_error_maps_to_app_error() {
    assert_eq!(AppError::from(TokenError::InvalidToken).status_code(), 403);
    assert_eq!(
        AppError::from(TokenError::Signing("boom".into())).status_code(),
        500
    );
}

#[test]
fn test_policy_from_config_defaults_match() {
    let config = fxcalc_shared::config::TokenConfig::default();
    assert_eq!(TokenPolicy::try_from(&config).unwrap(), TokenPolicy::default());
}

#[test]
fn test_policy_rejects_unrepresentable_days() {
    let config = fxcalc_shared::config::TokenConfig {
        refresh_token_expiry_days: i64::MAX,
        ..Default::default()
    };
    assert!(matches!(
        TokenPolicy::try_from(&config),
        Err(TokenError::LifetimeOutOfRange(_))
    ));
}

#[tokio::test]
async fn test_oversized_refresh_ttl_fails_without_panicking() {
    let (service, store) = service_with(TokenPolicy {
        refresh_token_ttl: Duration::days(200_000_000),
        ..TokenPolicy::default()
    });

    let err = service.create_refresh_token(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, TokenError::LifetimeOutOfRange(_)));
    assert_eq!(AppError::from(err).status_code(), 500);
    assert_eq!(store.len(), 0);
}
