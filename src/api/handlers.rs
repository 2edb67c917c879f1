//! API Handlers
//!
//! HTTP request handlers for the protected demo routes and the
//! diagnostics endpoints. This file is the composition point: the one
//! place the protection layer touches the surrounding finance app.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::models::{
    ExpenseRequest, ExpenseResponse, HealthResponse, MetricsResponse, MonthlySummary,
    SummaryResponse,
};

// == Storage Seam ==
/// The interface handlers use to reach the finance app's storage
/// backend (in-memory, relational, or spreadsheet-backed; external to
/// this crate).
pub trait SummarySource: Send + Sync {
    /// Computes the aggregate for a period from the backend.
    fn monthly_summary(&self, period: &str) -> MonthlySummary;

    /// Persists an expense through the backend.
    fn record_expense(&self, expense: &ExpenseRequest);
}

// == App State ==
/// Application state shared across all handlers.
///
/// Every field is a cheap clone-and-share handle.
#[derive(Clone)]
pub struct AppState {
    /// Cached monthly aggregates, keyed by period
    pub summaries: BoundedCache<String, MonthlySummary>,
    /// Per-client admission control for the write path
    pub limiter: RateLimiter,
    /// Storage backend seam
    pub source: Arc<dyn SummarySource>,
}

impl AppState {
    /// Creates a new AppState from existing handles.
    pub fn new(
        summaries: BoundedCache<String, MonthlySummary>,
        limiter: RateLimiter,
        source: Arc<dyn SummarySource>,
    ) -> Self {
        Self {
            summaries,
            limiter,
            source,
        }
    }

    /// Builds the cache and limiter from configuration.
    pub fn from_config(config: &Config, source: Arc<dyn SummarySource>) -> Result<Self> {
        let summaries = BoundedCache::new(config.cache_capacity, config.cache_ttl())?;
        let limiter = RateLimiter::new(
            config.rate_limit,
            config.rate_window(),
            config.client_idle(),
        )?;
        Ok(Self::new(summaries, limiter, source))
    }
}

/// Handler for GET /summary/:period
///
/// Cache-aside read: answer from the summary cache when possible,
/// otherwise compute through the storage seam and cache the result.
pub async fn summary_handler(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> Json<SummaryResponse> {
    if let Some(summary) = state.summaries.get(&period) {
        return Json(SummaryResponse {
            summary,
            cached: true,
        });
    }

    let summary = state.source.monthly_summary(&period);
    state.summaries.set(period, summary.clone());

    Json(SummaryResponse {
        summary,
        cached: false,
    })
}

/// Handler for POST /expenses
///
/// The guarded write path: persists the expense through the storage
/// seam, then invalidates the cached aggregate for the written period
/// so the next summary read recomputes it.
pub async fn record_expense_handler(
    State(state): State<AppState>,
    Json(req): Json<ExpenseRequest>,
) -> Response {
    if let Some(error) = req.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response();
    }

    state.source.record_expense(&req);
    state.summaries.delete(&req.period);

    Json(ExpenseResponse::new(req.period)).into_response()
}

/// Handler for GET /metrics
///
/// Flat name/value counters from the cache and the limiter.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    let stats = state.summaries.stats();

    Json(MetricsResponse {
        cache_entries: stats.entries as u64,
        cache_hits: stats.hits,
        cache_misses: stats.misses,
        cache_evictions: stats.evictions,
        cache_expirations: stats.expirations,
        limiter_active_clients: state.limiter.active_clients() as u64,
        limiter_admitted: state.limiter.admitted_total(),
        limiter_rejected: state.limiter.rejected_total(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
