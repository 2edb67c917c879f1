//! API Module
//!
//! The external-facing boundary: rate-limit middleware, the cache-aside
//! demo routes, and the diagnostics endpoints.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::{AppState, SummarySource};
pub use routes::create_router;
