// =============================================================================
// REST API Endpoints - Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  The service never fetches market data
// itself: callers POST the series (or a quote list plus history) and get the
// indicator snapshots back.
//
// CORS is permissive because the consumer is a browser table served from a
// different origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::market_data::{Bar, HistoryStore, Quote};
use crate::runtime_config::RuntimeConfig;
use crate::screener::{self, ScreenRow};

/// Screen requests carry full histories for hundreds of symbols.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/settings", get(get_settings).post(set_settings))
        .route("/api/v1/indicators", post(indicators))
        .route("/api/v1/screen", post(screen))
        // ── Middleware & State ───────────────────────────────────────
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Error responses
// =============================================================================

/// JSON error body `{ "error": "..." }` with a 4xx status.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    requests_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        requests_served: state.requests_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Settings
// =============================================================================

async fn get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read().clone();
    Json(config)
}

async fn set_settings(
    State(state): State<Arc<AppState>>,
    Json(config): Json<RuntimeConfig>,
) -> Result<Json<RuntimeConfig>, ApiError> {
    config
        .validate()
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    *state.runtime_config.write() = config.clone();
    info!(
        donchian_period = config.indicators.donchian_period,
        atr_period = config.indicators.atr_period,
        max_batch_symbols = config.max_batch_symbols,
        "runtime config updated via API"
    );
    Ok(Json(config))
}

// =============================================================================
// Single-symbol indicators
// =============================================================================

#[derive(Debug, Deserialize)]
struct IndicatorRequest {
    symbol: String,
    /// Falls back to the last bar's close when omitted.
    #[serde(default)]
    last_price: Option<f64>,
    #[serde(default)]
    bars: Vec<Bar>,
}

async fn indicators(
    State(state): State<Arc<AppState>>,
    Json(mut req): Json<IndicatorRequest>,
) -> Result<Json<screener::IndicatorSnapshot>, ApiError> {
    state.record_request();

    req.bars.sort_by_key(|b| b.date);
    let last_price = req
        .last_price
        .or_else(|| req.bars.last().map(|b| b.close))
        .ok_or_else(|| ApiError::unprocessable("last_price is required when no bars are given"))?;

    let settings = state.indicator_settings();
    screener::analyze(&req.symbol, &req.bars, last_price, &settings)
        .map(Json)
        .map_err(|e| {
            warn!(symbol = %req.symbol, error = %e, "indicator request rejected");
            ApiError::unprocessable(e.to_string())
        })
}

// =============================================================================
// Batch screen
// =============================================================================

#[derive(Debug, Deserialize)]
struct ScreenRequest {
    /// Quote list rows, in display order.
    stock: Vec<Quote>,
    /// Daily bars for any number of symbols, in any order.
    #[serde(default)]
    history: Vec<Bar>,
    #[serde(default)]
    as_of: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScreenResponse {
    run_id: String,
    as_of: Option<String>,
    rows: Vec<ScreenRow>,
}

async fn screen(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScreenRequest>,
) -> Result<Json<ScreenResponse>, ApiError> {
    state.record_request();

    let (settings, max_symbols) = {
        let cfg = state.runtime_config.read();
        (cfg.indicators, cfg.max_batch_symbols)
    };
    if req.stock.len() > max_symbols {
        return Err(ApiError {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: format!(
                "{} quotes exceeds the batch limit of {}",
                req.stock.len(),
                max_symbols
            ),
        });
    }

    let run_id = Uuid::new_v4().to_string();
    let history = HistoryStore::from_bars(req.history);
    let quotes_without_history = req
        .stock
        .iter()
        .filter(|q| history.len(&q.symbol) == 0)
        .count();
    info!(
        run_id = %run_id,
        quotes = req.stock.len(),
        symbols_with_history = history.symbol_count(),
        quotes_without_history,
        "screen batch started"
    );

    let rows = screener::screen_batch(req.stock, history, settings).await;

    Ok(Json(ScreenResponse {
        run_id,
        as_of: req.as_of,
        rows,
    }))
}
