//! Integration Tests for the Protection Boundary
//!
//! Drives full request/response cycles through the router: rate-limit
//! middleware, cache-aside summary reads, write invalidation, and the
//! diagnostics endpoints.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use ledger_guard::models::{ExpenseRequest, MonthlySummary};
use ledger_guard::{AppState, BoundedCache, RateLimiter, SummarySource};

// == Helper Functions ==

/// Storage-seam stub that counts computations and records writes.
struct CountingSource {
    computations: AtomicUsize,
    recorded: Mutex<Vec<ExpenseRequest>>,
}

impl CountingSource {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            computations: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        })
    }
}

impl SummarySource for CountingSource {
    fn monthly_summary(&self, period: &str) -> MonthlySummary {
        self.computations.fetch_add(1, Ordering::SeqCst);
        MonthlySummary {
            period: period.to_string(),
            total_cents: 8750,
            entry_count: 4,
        }
    }

    fn record_expense(&self, expense: &ExpenseRequest) {
        self.recorded.lock().unwrap().push(expense.clone());
    }
}

fn create_test_app(rate_limit: u32) -> (Router, Arc<CountingSource>) {
    let source = CountingSource::new();
    let state = AppState::new(
        BoundedCache::new(16, Duration::from_secs(300)).unwrap(),
        RateLimiter::new(rate_limit, Duration::from_secs(60), Duration::from_secs(600)).unwrap(),
        source.clone(),
    );
    (ledger_guard::create_router(state), source)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_summary(period: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/summary/{}", period))
        .body(Body::empty())
        .unwrap()
}

fn post_expense(client: &str, period: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/expenses")
        .header("content-type", "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(format!(
            r#"{{"period":"{}","amount_cents":1250}}"#,
            period
        )))
        .unwrap()
}

// == Summary Cache Tests ==

#[tokio::test]
async fn test_summary_is_computed_once_then_served_from_cache() {
    let (app, source) = create_test_app(60);

    let first = app.clone().oneshot(get_summary("2024-01")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_to_json(first.into_body()).await;
    assert_eq!(json["cached"], false);
    assert_eq!(json["total_cents"], 8750);

    let second = app.oneshot(get_summary("2024-01")).await.unwrap();
    let json = body_to_json(second.into_body()).await;
    assert_eq!(json["cached"], true);

    assert_eq!(source.computations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_distinct_periods_are_cached_independently() {
    let (app, source) = create_test_app(60);

    app.clone().oneshot(get_summary("2024-01")).await.unwrap();
    app.clone().oneshot(get_summary("2024-02")).await.unwrap();
    app.oneshot(get_summary("2024-01")).await.unwrap();

    assert_eq!(source.computations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_expense_write_invalidates_summary() {
    let (app, source) = create_test_app(60);

    // Prime the cache
    app.clone().oneshot(get_summary("2024-01")).await.unwrap();

    let write = app
        .clone()
        .oneshot(post_expense("203.0.113.1", "2024-01"))
        .await
        .unwrap();
    assert_eq!(write.status(), StatusCode::OK);
    assert_eq!(source.recorded.lock().unwrap().len(), 1);

    // Cache was invalidated, the next read recomputes
    let after = app.oneshot(get_summary("2024-01")).await.unwrap();
    let json = body_to_json(after.into_body()).await;
    assert_eq!(json["cached"], false);
    assert_eq!(source.computations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalid_expense_is_rejected() {
    let (app, source) = create_test_app(60);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/expenses")
                .header("content-type", "application/json")
                .header("x-forwarded-for", "203.0.113.1")
                .body(Body::from(r#"{"period":"","amount_cents":1250}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(source.recorded.lock().unwrap().len(), 0);
}

// == Rate Limit Tests ==

#[tokio::test]
async fn test_writes_past_the_limit_get_429_with_retry_after() {
    let (app, _) = create_test_app(3);

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(post_expense("203.0.113.1", "2024-01"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let rejected = app
        .oneshot(post_expense("203.0.113.1", "2024-01"))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        rejected.headers().get("retry-after").unwrap(),
        "60",
        "retry hint is the window length in seconds"
    );

    let json = body_to_json(rejected.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_limit_is_per_client() {
    let (app, _) = create_test_app(2);

    for _ in 0..2 {
        app.clone()
            .oneshot(post_expense("203.0.113.1", "2024-01"))
            .await
            .unwrap();
    }
    let rejected = app
        .clone()
        .oneshot(post_expense("203.0.113.1", "2024-01"))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client is admitted as usual
    let other = app
        .oneshot(post_expense("203.0.113.2", "2024-01"))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reads_are_not_rate_limited() {
    let (app, _) = create_test_app(1);

    // Exhaust the write limit for this client
    app.clone()
        .oneshot(post_expense("203.0.113.1", "2024-01"))
        .await
        .unwrap();
    let rejected = app
        .clone()
        .oneshot(post_expense("203.0.113.1", "2024-01"))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);

    // Reads stay open; the cache protects them instead
    for _ in 0..5 {
        let response = app.clone().oneshot(get_summary("2024-01")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// == Diagnostics Tests ==

#[tokio::test]
async fn test_metrics_expose_cache_and_limiter_counters() {
    let (app, _) = create_test_app(2);

    app.clone().oneshot(get_summary("2024-01")).await.unwrap(); // miss
    app.clone().oneshot(get_summary("2024-01")).await.unwrap(); // hit
    for _ in 0..3 {
        // Third write is rejected
        app.clone()
            .oneshot(post_expense("203.0.113.1", "2024-01"))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache_hits"], 1);
    assert_eq!(json["cache_misses"], 1);
    assert_eq!(json["limiter_admitted"], 2);
    assert_eq!(json["limiter_rejected"], 1);
    assert_eq!(json["limiter_active_clients"], 1);
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    let (app, _) = create_test_app(60);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
