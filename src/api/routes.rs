//! API Routes
//!
//! Configures the Axum router: protected demo routes behind the rate
//! limiter, plus the diagnostics endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, metrics_handler, record_expense_handler, summary_handler, AppState,
};
use super::middleware::rate_limit_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /expenses` - Record an expense (rate limited)
/// - `GET /summary/:period` - Cached monthly aggregate
/// - `GET /metrics` - Cache and limiter counters
/// - `GET /health` - Health check endpoint
///
/// Only the write path sits behind the limiter; reads are protected by
/// the cache instead.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let guarded = Router::new()
        .route("/expenses", post(record_expense_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(guarded)
        .route("/summary/:period", get(summary_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
