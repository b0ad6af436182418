//! Document store client
//!
//! Talks to the store's versioned HTTPS API: filter/sort queries against a
//! database, plus per-page block fetches for body text. Every request runs
//! under a retry budget; body fetches get a reduced one so a slow failure
//! path cannot dominate a whole digest.

use crate::config::NotionConfig;
use crate::document::Document;
use crate::error::{DigestError, Result};
use crate::retry::{with_retry, RetryPolicy};
use crate::MAX_PAGE_SIZE;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub mod blocks;
pub mod query;

pub use query::{PeriodQuery, SortBy};

/// Attempt budget for per-document body fetches
const BODY_FETCH_ATTEMPTS: u32 = 2;

const SERVICE_NAME: &str = "document store";

/// Body text for one record. A failed fetch is reported here, never as an
/// error; callers treat it as "no body available".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBody {
    pub text: String,
    pub failed: bool,
}

impl PageBody {
    /// Empty body with the failure flag set
    pub fn unavailable() -> Self {
        Self {
            text: String::new(),
            failed: true,
        }
    }
}

/// Trait for record sources - the pipeline is written against this seam
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Keyword search over structural fields; `content` is left empty
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Document>>;

    /// Records dated on or after the window start
    async fn list_period(&self, params: &PeriodQuery) -> Result<Vec<Document>>;

    /// Body text for one record
    async fn fetch_body(&self, page_id: &str) -> PageBody;
}

/// Client for the store's query and block APIs
pub struct NotionClient {
    http_client: reqwest::Client,
    config: NotionConfig,
    retry: RetryPolicy,
    body_retry: RetryPolicy,
}

impl NotionClient {
    /// Create a new client from configuration
    pub fn new(config: NotionConfig, retry: RetryPolicy) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let body_retry = RetryPolicy {
            max_attempts: BODY_FETCH_ATTEMPTS,
            ..retry
        };

        Ok(Self {
            http_client,
            config,
            retry,
            body_retry,
        })
    }

    /// POST one query body against the configured database
    async fn run_query(&self, body: &Value) -> Result<Vec<Value>> {
        let url = format!(
            "{}/v1/databases/{}/query",
            self.config.url, self.config.database_id
        );

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Notion-Version", &self.config.version)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            tracing::debug!("document store error body: {}", detail);
            return Err(DigestError::Upstream {
                service: SERVICE_NAME,
                status,
            });
        }

        let payload: Value = response.json().await?;
        Ok(payload
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// GET the block children of one page
    async fn run_block_fetch(&self, page_id: &str) -> Result<Vec<Value>> {
        let url = format!(
            "{}/v1/blocks/{}/children?page_size={}",
            self.config.url, page_id, MAX_PAGE_SIZE
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Notion-Version", &self.config.version)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(DigestError::Upstream {
                service: SERVICE_NAME,
                status,
            });
        }

        let payload: Value = response.json().await?;
        Ok(payload
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentSource for NotionClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        let body = query::multi_term_filter(query, limit)?;
        let records =
            with_retry("document store search", &self.retry, || self.run_query(&body)).await?;
        tracing::debug!("search returned {} records", records.len());
        Ok(map_records(&records))
    }

    async fn list_period(&self, params: &PeriodQuery) -> Result<Vec<Document>> {
        let body = query::period_filter(params);
        let records = with_retry("document store period query", &self.retry, || {
            self.run_query(&body)
        })
        .await?;
        tracing::debug!("period query returned {} records", records.len());
        Ok(map_records(&records))
    }

    async fn fetch_body(&self, page_id: &str) -> PageBody {
        let result = with_retry("body fetch", &self.body_retry, || {
            self.run_block_fetch(page_id)
        })
        .await;

        match result {
            Ok(block_list) => PageBody {
                text: blocks::extract_text(&block_list),
                failed: false,
            },
            Err(err) => {
                tracing::warn!("body for {} unavailable: {}", page_id, err);
                PageBody::unavailable()
            }
        }
    }
}

/// Map raw records into documents. A record that fails to map becomes a
/// placeholder instead of aborting the batch.
fn map_records(records: &[Value]) -> Vec<Document> {
    records
        .iter()
        .map(|record| match Document::from_page(record) {
            Ok(doc) => doc,
            Err(err) => {
                let id = record
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                tracing::warn!("record {} could not be mapped: {}", id, err);
                Document::placeholder(id)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T00:00:00.000Z",
            "url": format!("https://notes.example.com/{}", id),
            "properties": {
                "Name": { "title": [{ "plain_text": title }] },
            },
        })
    }

    #[test]
    fn mapping_failures_become_placeholders() {
        let records = vec![
            page("a", "First note"),
            json!({ "no_id_here": true }),
            page("c", "Third note"),
        ];

        let docs = map_records(&records);

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].title, "First note");
        assert!(docs[1].is_placeholder());
        assert_eq!(docs[1].id, "unknown");
        assert_eq!(docs[2].id, "c");
    }

    #[test]
    fn placeholder_keeps_the_record_id_when_present() {
        // id exists but is empty, so mapping fails while the raw id is "".
        let records = vec![json!({ "id": "", "properties": {} })];
        let docs = map_records(&records);

        assert!(docs[0].is_placeholder());
        assert_eq!(docs[0].id, "");
    }

    #[test]
    fn unavailable_body_is_flagged_and_empty() {
        let body = PageBody::unavailable();
        assert!(body.failed);
        assert!(body.text.is_empty());

        let ok = PageBody {
            text: "hello".to_string(),
            failed: false,
        };
        assert!(!ok.failed);
    }

    #[test]
    fn body_retry_budget_is_reduced() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 100,
            backoff_factor: 2.0,
        };
        let body_retry = RetryPolicy {
            max_attempts: BODY_FETCH_ATTEMPTS,
            ..policy
        };

        assert_eq!(body_retry.max_attempts, 2);
        assert_eq!(body_retry.base_delay_ms, 100);
    }
}
