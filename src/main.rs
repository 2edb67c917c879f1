//! Ledger Guard - protective layer server
//!
//! Stands the protection layer up as an HTTP service: cached monthly
//! summaries, a rate-limited write path, and diagnostics endpoints.
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Build the summary cache and rate limiter
//! 4. Start the background purge and idle-sweep cycles
//! 5. Create the Axum router with middleware and endpoints
//! 6. Serve until SIGINT/SIGTERM, then stop the sweeps and exit

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_guard::models::{ExpenseRequest, MonthlySummary};
use ledger_guard::{create_router, AppState, CacheCoordinator, Config, SummarySource};

/// Stand-in storage seam for standalone runs.
///
/// A deployment wires the finance app's real backend (relational or
/// spreadsheet-backed) here instead.
struct EmptyLedger;

impl SummarySource for EmptyLedger {
    fn monthly_summary(&self, period: &str) -> MonthlySummary {
        MonthlySummary {
            period: period.to_string(),
            total_cents: 0,
            entry_count: 0,
        }
    }

    fn record_expense(&self, _expense: &ExpenseRequest) {}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledger_guard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ledger Guard");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, cache_ttl={}s, rate_limit={}/{}s, port={}",
        config.cache_capacity,
        config.cache_ttl_secs,
        config.rate_limit,
        config.rate_window_secs,
        config.server_port
    );

    let state = AppState::from_config(&config, Arc::new(EmptyLedger))
        .context("invalid cache or limiter configuration")?;
    info!("Summary cache and rate limiter initialized");

    // Background maintenance: one purge cycle over all caches, one idle
    // sweep inside the limiter
    let coordinator = CacheCoordinator::new();
    coordinator.register(Arc::new(state.summaries.clone()));
    coordinator
        .run_periodic(std::time::Duration::from_secs(config.purge_interval_secs))
        .context("invalid purge interval")?;

    state
        .limiter
        .run_idle_sweep(std::time::Duration::from_secs(
            config.idle_sweep_interval_secs,
        ))
        .context("invalid idle sweep interval")?;
    info!("Background sweeps started");

    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    // Sweeps are stopped synchronously: once these return, no further
    // background mutation occurs
    coordinator.stop().await;
    state.limiter.stop().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
