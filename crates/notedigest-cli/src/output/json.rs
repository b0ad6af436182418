//! JSON output formatter

use notedigest_core::{PeriodSummaryResult, QueryDigest};

pub fn format_query_digest(digest: &QueryDigest) -> String {
    serde_json::to_string_pretty(digest).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_period_summary(result: &PeriodSummaryResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
