//! Response DTOs for the protection boundary
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

/// A month's aggregated expenses, the value cached by the summary cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Period the aggregate covers, e.g. "2024-01"
    pub period: String,
    /// Sum of all expenses in cents
    pub total_cents: i64,
    /// Number of expenses aggregated
    pub entry_count: u64,
}

/// Response body for the summary endpoint (GET /summary/:period)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: MonthlySummary,
    /// True when the aggregate came from the cache rather than storage
    pub cached: bool,
}

/// Response body for the expense endpoint (POST /expenses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseResponse {
    /// Success message
    pub message: String,
    /// The period whose cached aggregate was invalidated
    pub period: String,
}

impl ExpenseResponse {
    /// Creates a new ExpenseResponse
    pub fn new(period: impl Into<String>) -> Self {
        let period = period.into();
        Self {
            message: format!("Expense recorded for period '{}'", period),
            period,
        }
    }
}

/// Response body for the diagnostics endpoint (GET /metrics)
///
/// Plain name/value counters, no schema beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub cache_entries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_evictions: u64,
    pub cache_expirations: u64,
    pub limiter_active_clients: u64,
    pub limiter_admitted: u64,
    pub limiter_rejected: u64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status, always "healthy" when the server responds
    pub status: String,
    /// RFC 3339 timestamp of the response
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy response stamped with the current time.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_response_mentions_period() {
        let response = ExpenseResponse::new("2024-03");
        assert_eq!(response.period, "2024-03");
        assert!(response.message.contains("2024-03"));
    }

    #[test]
    fn test_health_response() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "healthy");
        assert!(!response.timestamp.is_empty());
    }

    #[test]
    fn test_summary_response_flattens_summary() {
        let response = SummaryResponse {
            summary: MonthlySummary {
                period: "2024-01".to_string(),
                total_cents: 12500,
                entry_count: 3,
            },
            cached: true,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["period"], "2024-01");
        assert_eq!(json["total_cents"], 12500);
        assert_eq!(json["cached"], true);
    }
}
