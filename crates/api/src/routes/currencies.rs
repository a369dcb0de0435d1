//! Currency and exchange-rate routes.
//!
//! Listing and conversion need the viewer role; every write needs editor.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post, put},
};
use fxcalc_core::store::Backend;
use fxcalc_shared::currency::{
    ConvertRequest, CreateCurrencyRequest, DeleteCurrencyRequest, RemoveRateRequest,
    SetRateRequest,
};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{Authorized, Editor, ValidatedJson, Viewer};
use crate::response;

/// Creates the currency routes (requires auth middleware to be applied externally).
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        .route(
            "/currencies",
            get(list_currencies::<B>)
                .post(create_currency::<B>)
                .delete(delete_currency::<B>),
        )
        .route(
            "/currencies/rate",
            put(set_exchange_rate::<B>).delete(remove_exchange_rate::<B>),
        )
        .route("/currencies/convert", post(convert::<B>))
}

/// GET /currencies - List all currencies with their rates.
async fn list_currencies<B: Backend>(
    State(state): State<AppState<B>>,
    _auth: Authorized<Viewer>,
) -> Result<Response, ApiError> {
    let currencies = state.currencies.get_all_currencies().await?;
    Ok(response::success_with_result(currencies))
}

/// POST /currencies - Create a currency.
async fn create_currency<B: Backend>(
    State(state): State<AppState<B>>,
    auth: Authorized<Editor>,
    ValidatedJson(payload): ValidatedJson<CreateCurrencyRequest>,
) -> Result<Response, ApiError> {
    let currency = state
        .currencies
        .create_currency(&payload.symbol, &payload.name)
        .await?;

    info!(user_id = %auth.claims().user_id(), symbol = %currency.symbol, "Currency added via API");
    Ok(response::created(format!(
        "Successfully added {}",
        currency.symbol
    )))
}

/// DELETE /currencies - Delete a currency and every rate pointing at it.
async fn delete_currency<B: Backend>(
    State(state): State<AppState<B>>,
    _auth: Authorized<Editor>,
    ValidatedJson(payload): ValidatedJson<DeleteCurrencyRequest>,
) -> Result<Response, ApiError> {
    state.currencies.delete_currency(&payload.symbol).await?;
    Ok(response::no_content())
}

/// PUT /currencies/rate - Set a rate and its inverse.
async fn set_exchange_rate<B: Backend>(
    State(state): State<AppState<B>>,
    _auth: Authorized<Editor>,
    ValidatedJson(payload): ValidatedJson<SetRateRequest>,
) -> Result<Response, ApiError> {
    state
        .currencies
        .set_exchange_rate(&payload.base, &payload.target, payload.rate)
        .await?;

    Ok(response::created(format!(
        "Successfully set exchange rate: {} -> {}: {}",
        payload.base, payload.target, payload.rate
    )))
}

/// DELETE /currencies/rate - Remove a rate and its inverse.
async fn remove_exchange_rate<B: Backend>(
    State(state): State<AppState<B>>,
    _auth: Authorized<Editor>,
    ValidatedJson(payload): ValidatedJson<RemoveRateRequest>,
) -> Result<Response, ApiError> {
    state
        .currencies
        .remove_exchange_rate(&payload.base, &payload.target)
        .await?;
    Ok(response::no_content())
}

/// POST /currencies/convert - Convert an amount over a direct rate.
async fn convert<B: Backend>(
    State(state): State<AppState<B>>,
    _auth: Authorized<Viewer>,
    ValidatedJson(payload): ValidatedJson<ConvertRequest>,
) -> Result<Response, ApiError> {
    let conversion = state
        .currencies
        .convert_currency(&payload.base, &payload.target, payload.amount)
        .await?;
    Ok(response::success(conversion))
}
