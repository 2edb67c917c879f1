//! Request DTOs for the protection boundary
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Serialize};

/// Request body for recording an expense (POST /expenses)
///
/// The write path the rate limiter guards. Persistence happens behind
/// the storage seam; this layer only validates the shape and
/// invalidates the cached aggregate for the written period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRequest {
    /// Period the expense belongs to, e.g. "2024-01"
    pub period: String,
    /// Amount in cents; negative values record corrections
    pub amount_cents: i64,
    /// Optional spending category
    #[serde(default)]
    pub category: Option<String>,
}

impl ExpenseRequest {
    /// Validates the request, returning an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if self.period.trim().is_empty() {
            return Some("period must not be empty".to_string());
        }
        if self.amount_cents == 0 {
            return Some("amount_cents must not be zero".to_string());
        }
        None
    }
}
