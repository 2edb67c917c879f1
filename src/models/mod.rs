//! Data Transfer Objects
//!
//! Request and response bodies crossing the HTTP boundary.

mod requests;
mod responses;

pub use requests::ExpenseRequest;
pub use responses::{
    ExpenseResponse, HealthResponse, MetricsResponse, MonthlySummary, SummaryResponse,
};
