//! Output formatters

pub mod json;
pub mod markdown;
pub mod terminal;

use crate::app::OutputFormat;
use notedigest_core::{PeriodSummaryResult, QueryDigest};

/// Format a query digest
pub fn format_query_digest(digest: &QueryDigest, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_query_digest(digest),
        OutputFormat::Md => markdown::format_query_digest(digest),
        OutputFormat::Cli => terminal::format_query_digest(digest),
    }
}

/// Format a period summary
pub fn format_period_summary(result: &PeriodSummaryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_period_summary(result),
        OutputFormat::Md => markdown::format_period_summary(result),
        OutputFormat::Cli => terminal::format_period_summary(result),
    }
}
