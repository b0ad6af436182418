//! Request orchestration
//!
//! One logical thread of control per request: search, body fetches, and
//! the model call run strictly in sequence. The pipeline is also the error
//! boundary - internal failures are logged with their detail and surface
//! as a single generic error, except invalid input which passes through.

use crate::document::{Document, IMPORTANCE_LEVELS};
use crate::error::{DigestError, Result};
use crate::notion::{DocumentSource, PeriodQuery, SortBy};
use crate::rank::rank_by_relevance;
use crate::summarize::{
    parse, period_prompt, query_prompt, PeriodPromptParams, SummaryModel, PERIOD_PROMPT_MAX_DOCS,
};
use crate::summary::{PageCounts, PeriodInfo, PeriodSummaryResult, SummaryResult};
use crate::MAX_PAGE_SIZE;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Longest accepted search query, in characters
pub const MAX_QUERY_CHARS: usize = 500;

/// Over-fetch factor: candidates pulled per requested result slot, so
/// ranking has structural matches to discard
const CANDIDATE_FACTOR: usize = 3;

const DEFAULT_DAYS_BACK: u32 = 7;
const MAX_DAYS_BACK: u32 = 30;
const DEFAULT_MAX_PAGES: usize = 20;
const MAX_PERIOD_PAGES: usize = 50;

/// Options for a period digest; unset fields take defaults, out-of-range
/// values are clamped rather than rejected
#[derive(Debug, Clone, Default)]
pub struct RecentOptions {
    pub days_back: Option<u32>,
    pub importance: Option<Vec<String>>,
    pub category: Option<String>,
    pub max_pages: Option<usize>,
    pub sort_by: SortBy,
}

/// One ranked document reference in a digest envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDoc {
    pub id: String,
    pub score: u32,
}

/// Full outcome of a query digest: the summary plus which documents fed
/// it and how long the request took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDigest {
    pub query: String,
    pub result: SummaryResult,
    pub documents: Vec<RankedDoc>,
    pub elapsed_ms: u64,
}

/// Orchestrator tying the document source to the summary model
pub struct Pipeline {
    source: Arc<dyn DocumentSource>,
    model: Arc<dyn SummaryModel>,
}

impl Pipeline {
    /// Create a pipeline over explicit source and model seams
    pub fn new(source: Arc<dyn DocumentSource>, model: Arc<dyn SummaryModel>) -> Self {
        Self { source, model }
    }

    /// Wire the real clients from configuration
    pub fn from_config(config: crate::config::Config) -> Result<Self> {
        let source = crate::notion::NotionClient::new(config.notion, config.retry)?;
        let model = crate::summarize::GeminiClient::new(config.gemini, config.retry)?;
        Ok(Self::new(Arc::new(source), Arc::new(model)))
    }

    /// Search for notes matching `query` and summarize the best `limit`.
    ///
    /// Rejects empty or oversized queries with `InvalidQuery`; every other
    /// failure surfaces as the generic `RequestFailed`.
    pub async fn search_and_summarize(&self, query: &str, limit: usize) -> Result<QueryDigest> {
        let started = Instant::now();

        let query = query.trim();
        if query.is_empty() {
            return Err(DigestError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(DigestError::InvalidQuery(format!(
                "query exceeds {} characters",
                MAX_QUERY_CHARS
            )));
        }
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let mut digest = match self.run_search(query, limit).await {
            Ok(digest) => digest,
            Err(err @ DigestError::InvalidQuery(_)) => return Err(err),
            Err(err) => {
                tracing::error!("search digest for {:?} failed: {}", query, err);
                return Err(DigestError::RequestFailed);
            }
        };

        digest.elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            "digest for {:?}: {} documents in {}ms",
            query,
            digest.documents.len(),
            digest.elapsed_ms
        );
        Ok(digest)
    }

    /// Summarize the notes of a recent window.
    ///
    /// All option fields are clamped or defaulted, never rejected; failures
    /// surface as the generic `RequestFailed`.
    pub async fn recent_digest(&self, options: RecentOptions) -> Result<PeriodSummaryResult> {
        let days_back = options
            .days_back
            .unwrap_or(DEFAULT_DAYS_BACK)
            .clamp(1, MAX_DAYS_BACK);
        let max_pages = options
            .max_pages
            .unwrap_or(DEFAULT_MAX_PAGES)
            .clamp(1, MAX_PERIOD_PAGES);
        let period = period_window(days_back);

        let params = PeriodQuery {
            start_date: period.start_date.clone(),
            importance: normalize_importance(options.importance.as_deref()),
            category: options.category,
            limit: max_pages,
            sort_by: options.sort_by,
        };

        match self.run_period(&params, &period).await {
            Ok(result) => {
                tracing::info!(
                    "period digest over {} days: {} records",
                    days_back,
                    result.pages_processed.total_found
                );
                Ok(result)
            }
            Err(err @ DigestError::InvalidQuery(_)) => Err(err),
            Err(err) => {
                tracing::error!("period digest failed: {}", err);
                Err(DigestError::RequestFailed)
            }
        }
    }

    async fn run_search(&self, query: &str, limit: usize) -> Result<QueryDigest> {
        let candidates = self.source.search(query, limit * CANDIDATE_FACTOR).await?;
        tracing::debug!("search produced {} candidates", candidates.len());

        let mut enriched = Vec::with_capacity(candidates.len());
        for mut doc in candidates {
            let body = self.source.fetch_body(&doc.id).await;
            if !body.failed {
                doc.content = body.text;
            }
            enriched.push(doc);
        }

        let ranked = rank_by_relevance(query, enriched, limit);
        if ranked.is_empty() {
            tracing::debug!("no documents matched {:?}", query);
            return Ok(QueryDigest {
                query: query.to_string(),
                result: SummaryResult::no_data(),
                documents: Vec::new(),
                elapsed_ms: 0,
            });
        }

        let prompt = query_prompt(query, &ranked);
        tracing::debug!("summarizing {} documents with {}", ranked.len(), self.model.model_name());
        let raw = self.model.generate(&prompt).await?;
        let result = parse::query_summary(&raw);

        let documents = ranked
            .iter()
            .map(|doc| RankedDoc {
                id: doc.id.clone(),
                score: doc.score.unwrap_or(0),
            })
            .collect();

        Ok(QueryDigest {
            query: query.to_string(),
            result,
            documents,
            elapsed_ms: 0,
        })
    }

    async fn run_period(
        &self,
        params: &PeriodQuery,
        period: &PeriodInfo,
    ) -> Result<PeriodSummaryResult> {
        let records = self.source.list_period(params).await?;
        let total_found = records.len();

        // Placeholders carry no summarizable material
        let mut usable: Vec<Document> = records
            .into_iter()
            .filter(|doc| !doc.is_placeholder())
            .collect();
        let after_filter = usable.len();

        for doc in &mut usable {
            let body = self.source.fetch_body(&doc.id).await;
            if !body.failed {
                doc.content = body.text;
            }
        }

        let pages = PageCounts {
            total_found,
            after_filter,
            processed: after_filter.min(PERIOD_PROMPT_MAX_DOCS),
        };

        if usable.is_empty() {
            tracing::debug!("no records on or after {}", params.start_date);
            return Ok(PeriodSummaryResult::no_data(period.clone(), pages));
        }

        let prompt_params = PeriodPromptParams {
            start_date: period.start_date.clone(),
            end_date: period.end_date.clone(),
            days: period.days_analyzed,
            importance: params.importance.clone(),
            category: params.category.clone(),
        };
        let prompt = period_prompt(&usable, &prompt_params);
        tracing::debug!("summarizing {} records with {}", usable.len(), self.model.model_name());
        let raw = self.model.generate(&prompt).await?;

        Ok(match parse::period_summary(&raw) {
            Some(summary) => PeriodSummaryResult {
                summary,
                period: period.clone(),
                pages_processed: pages,
                error: false,
            },
            None => PeriodSummaryResult::failed(period.clone(), pages),
        })
    }
}

/// Date window ending today, formatted as ISO dates
fn period_window(days_back: u32) -> PeriodInfo {
    let end = Utc::now().date_naive();
    let start = end - chrono::Duration::days(days_back as i64);

    PeriodInfo {
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        days_analyzed: days_back,
    }
}

/// Keep only known importance levels; an empty survivor set means no filter
fn normalize_importance(levels: Option<&[String]>) -> Option<Vec<String>> {
    let kept: Vec<String> = levels?
        .iter()
        .filter(|level| IMPORTANCE_LEVELS.contains(&level.as_str()))
        .cloned()
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}
