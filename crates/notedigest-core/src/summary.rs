//! Digest result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relevance grade attached to a recent record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    Medium,
    Low,
}

impl Relevance {
    /// Coerce a loosely-typed value into the vocabulary; anything
    /// unrecognized becomes medium
    pub fn coerce(value: Option<&str>) -> Self {
        match value {
            Some("high") => Self::High,
            Some("low") => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{}", label)
    }
}

/// One record singled out as recent material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRecord {
    pub date: String,
    pub title: String,
    pub content: String,
    pub relevance: Relevance,
}

/// Rollup of material older than the recent window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OlderRecords {
    pub count: u32,
    pub period: String,
    pub summary: String,
}

/// Output of query-based summarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub recent_records: Vec<RecentRecord>,
    pub older_records: OlderRecords,
    pub no_data: bool,
}

impl SummaryResult {
    /// Canonical result when no relevant documents exist
    pub fn no_data() -> Self {
        Self {
            summary: "No matching notes were found.".to_string(),
            recent_records: Vec::new(),
            older_records: OlderRecords::default(),
            no_data: true,
        }
    }

    /// Degraded result when the model output was unusable
    pub fn failed() -> Self {
        Self {
            summary: "Summary generation failed.".to_string(),
            recent_records: Vec::new(),
            older_records: OlderRecords::default(),
            no_data: true,
        }
    }
}

/// Date window a period digest covered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInfo {
    pub start_date: String,
    pub end_date: String,
    pub days_analyzed: u32,
}

/// Page accounting for a period digest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCounts {
    /// Records the store returned
    pub total_found: usize,
    /// Records that survived mapping
    pub after_filter: usize,
    /// Records actually placed in the prompt
    pub processed: usize,
}

/// Output of period-based summarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummaryResult {
    pub summary: String,
    pub period: PeriodInfo,
    pub pages_processed: PageCounts,
    pub error: bool,
}

impl PeriodSummaryResult {
    /// Canonical result when the window held no usable records
    pub fn no_data(period: PeriodInfo, pages: PageCounts) -> Self {
        Self {
            summary: "No notes were found in this period.".to_string(),
            period,
            pages_processed: pages,
            error: false,
        }
    }

    /// Degraded result when the model output was unusable
    pub fn failed(period: PeriodInfo, pages: PageCounts) -> Self {
        Self {
            summary: "Summary generation failed.".to_string(),
            period,
            pages_processed: pages,
            error: true,
        }
    }
}
