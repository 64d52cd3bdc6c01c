//! HTTP API for the quote engine.
//!
//! This module exposes a minimal REST API around the estimator using
//! the [`axum`](https://crates.io/crates/axum) framework.  Clients
//! submit a shipment quote request (or a batch of them) and receive
//! the priced quote as JSON.  The server prices against the same
//! [`RateSchedule`] the library exposes, initialised from built-in
//! rates and optionally overridden by rate card files on disk.

use crate::engine::{quote, run_quote_batch};
use crate::models::{Incoterm, QuoteBatchInput, ShipmentQuoteRequest, PRODUCT_CATEGORIES};
use crate::rates::{
    load_rate_cards_from_dir, RateSchedule, DEFAULT_DUTY_RATE, DEFAULT_FREIGHT_PER_KG,
};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across requests.
pub struct AppState {
    pub rates: RwLock<RateSchedule>,
}

/// Build the API router and initialise the rate schedule from the
/// given directory.  Returns the router and a handle to the state.
///
/// The schedule starts from the built-in rates; cards found under
/// `rates_dir` override them per destination.  A missing directory is
/// not an error, the built-in rates simply stand.
pub async fn build_router(rates_dir: PathBuf) -> Result<(Router, Arc<AppState>)> {
    let mut schedule = RateSchedule::default();
    if rates_dir.is_dir() {
        let cards = load_rate_cards_from_dir(&rates_dir)?;
        tracing::info!(
            count = cards.len(),
            dir = %rates_dir.display(),
            "loaded rate cards"
        );
        schedule.extend(cards);
    } else {
        tracing::info!(
            dir = %rates_dir.display(),
            "no rate card directory, using built-in rates"
        );
    }
    let state = Arc::new(AppState {
        rates: RwLock::new(schedule),
    });
    let router = Router::new()
        .route("/api/quote", post(quote_handler))
        .route("/api/quote/batch", post(batch_handler))
        .route("/api/rates", get(rates_handler))
        .route("/api/reference", get(reference_handler))
        .route("/health", get(health_handler))
        .with_state(state.clone());
    Ok((router, state))
}

/// Handler for POST /api/quote.  Rejects negative or non-finite
/// amounts with a typed 400; blank fields already deserialised to
/// zero and price as such.
async fn quote_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ShipmentQuoteRequest>,
) -> impl IntoResponse {
    if let Err(err) = request.validate() {
        let body = Json(json!({"error": err.to_string()}));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }
    let rates = app_state.rates.read().await;
    let result = quote(request, &rates);
    (StatusCode::OK, Json(result)).into_response()
}

/// Handler for POST /api/quote/batch.  Batch pricing is lenient all
/// the way through: every request prices, degenerate input prices as
/// zero.
async fn batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(input): Json<QuoteBatchInput>,
) -> impl IntoResponse {
    let rates = app_state.rates.read().await;
    match run_quote_batch(input, &rates) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            let body = Json(json!({"error": err.to_string()}));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

/// Handler for GET /api/rates: the active rate cards plus the default
/// rates applied to destinations without a card.
async fn rates_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let rates = app_state.rates.read().await;
    let body = json!({
        "cards": rates.cards(),
        "default": {
            "freight_per_kg": DEFAULT_FREIGHT_PER_KG,
            "duty_rate": DEFAULT_DUTY_RATE,
        },
    });
    Json(body)
}

/// Handler for GET /api/reference: the catalogs the quote form is
/// built from.
async fn reference_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let rates = app_state.rates.read().await;
    let incoterms: Vec<_> = Incoterm::ALL
        .iter()
        .map(|incoterm| {
            json!({
                "value": incoterm,
                "label": incoterm.label(),
                "description": incoterm.description(),
            })
        })
        .collect();
    let body = json!({
        "destinations": rates.destinations(),
        "productCategories": PRODUCT_CATEGORIES,
        "incoterms": incoterms,
    });
    Json(body)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Launch the API server.  Builds the router from the given rate card
/// directory, binds to the supplied address and blocks until the
/// server terminates.
pub async fn serve(addr: &str, rates_dir: PathBuf) -> Result<()> {
    let (router, _state) = build_router(rates_dir).await?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, router).await.map_err(|e| e.into())
}
