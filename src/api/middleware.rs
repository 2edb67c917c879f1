//! Protection Middleware
//!
//! Wraps inbound handlers: derives a client identifier, consults the
//! rate limiter, and either delegates to the wrapped handler or answers
//! 429 with a Retry-After hint.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use super::handlers::AppState;

/// Rejected requests carry the window length as the retry hint.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_id(&request);

    if state.limiter.allow(&client) {
        return next.run(request).await;
    }

    debug!("rate limit exceeded for client {}", client);

    let retry_after = state.limiter.window().as_secs().to_string();
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after)],
        Json(json!({ "error": "rate limit exceeded" })),
    )
        .into_response()
}

/// Derives the client identifier for rate limiting.
///
/// Prefers the first entry of `X-Forwarded-For` (set by a trusted
/// proxy), falls back to the peer address, then to a fixed marker so
/// unidentifiable clients share one bucket.
fn client_id(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
