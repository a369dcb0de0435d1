//! fxcalc API server
//!
//! Main entry point for the currency calculator backend.

use std::sync::Arc;
use std::time::Duration;

use fxcalc_api::{AppState, create_router};
use fxcalc_core::store::memory::{
    MemoryBackend, MemoryCurrencyStore, MemoryTokenStore, MemoryUserStore,
};
use fxcalc_core::store::{Backend, RefreshTokenStore};
use fxcalc_core::token::{TokenPolicy, TokenService};
use fxcalc_db::{
    CurrencyRepository, PostgresBackend, RefreshTokenRepository, UserRepository, connect,
};
use fxcalc_shared::config::LogFormat;
use fxcalc_shared::{AppConfig, JwtService};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(config.log.format);

    let jwt = Arc::new(JwtService::new(config.jwt_config()?));
    let policy = TokenPolicy::try_from(&config.tokens)?;

    if config.database.is_memory() {
        warn!("Using the in-memory store; data is lost on restart");
        let state = AppState::<MemoryBackend>::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(MemoryCurrencyStore::new()),
            jwt,
            policy,
        );
        serve(state, &config).await
    } else {
        let db = connect(&config.database).await?;
        info!("Connected to database");
        let state = AppState::<PostgresBackend>::new(
            Arc::new(UserRepository::new(db.clone())),
            Arc::new(RefreshTokenRepository::new(db.clone())),
            Arc::new(CurrencyRepository::new(db)),
            jwt,
            policy,
        );
        serve(state, &config).await
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fxcalc=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn serve<B: Backend>(state: AppState<B>, config: &AppConfig) -> anyhow::Result<()> {
    spawn_token_cleanup(Arc::clone(&state.tokens), config.tokens.cleanup_interval_secs);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Runs refresh token cleanup every `interval_secs`; zero disables it.
fn spawn_token_cleanup<R: RefreshTokenStore + 'static>(
    tokens: Arc<TokenService<R>>,
    interval_secs: u64,
) {
    if interval_secs == 0 {
        info!("Refresh token cleanup disabled");
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            if let Err(e) = tokens.cleanup_expired_tokens().await {
                error!(error = %e, "Refresh token cleanup failed");
            }
        }
    });
}
