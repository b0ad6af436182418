//! Notedigest Core Library
//!
//! Core functionality for the notedigest knowledge-retrieval backend: it
//! bridges a structured note store and an LLM summarization endpoint.
//!
//! # Features
//! - Multi-keyword OR filtering against the store's query API
//! - Relevance ranking that blends structural field hits with body-text
//!   occurrence counts
//! - Prompt assembly with strict data/instruction separation
//! - Defensive JSON extraction from free-text model output
//! - Bounded retry with exponential backoff around every network call

pub mod config;
pub mod document;
pub mod error;
pub mod notion;
pub mod pipeline;
pub mod rank;
pub mod retry;
pub mod summarize;
pub mod summary;

pub use config::{Config, GeminiConfig, NotionConfig};
pub use document::{Document, IMPORTANCE_LEVELS};
pub use error::{DigestError, Error, Result};
pub use notion::{DocumentSource, NotionClient, PageBody, PeriodQuery, SortBy};
pub use pipeline::{Pipeline, QueryDigest, RankedDoc, RecentOptions};
pub use rank::rank_by_relevance;
pub use retry::{with_retry, RetryPolicy};
pub use summarize::{
    period_prompt, query_prompt, GeminiClient, PeriodPromptParams, SummaryModel,
};
pub use summary::{
    OlderRecords, PageCounts, PeriodInfo, PeriodSummaryResult, RecentRecord, Relevance,
    SummaryResult,
};

/// Largest page_size the store accepts per query
pub const MAX_PAGE_SIZE: usize = 100;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "notedigest";
