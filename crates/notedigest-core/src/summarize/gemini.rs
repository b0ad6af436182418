//! Summarization model client

use crate::config::GeminiConfig;
use crate::error::{DigestError, Result};
use crate::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const SERVICE_NAME: &str = "summarization service";

/// Harm categories pinned open; the corpus is the user's own notes
const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Trait for summary generators - the pipeline is written against this seam
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Run one prompt and return the raw model text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Client for the model's generateContent API
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GeminiConfig,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn new(config: GeminiConfig, retry: RetryPolicy) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
            retry,
        })
    }

    /// POST one generation request
    async fn run_generate(&self, body: &Value) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.url, self.config.model
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            tracing::debug!("summarization service error body: {}", detail);
            return Err(DigestError::Upstream {
                service: SERVICE_NAME,
                status,
            });
        }

        let payload: Value = response.json().await?;
        extract_text(&payload)
            .ok_or_else(|| DigestError::Model("response carried no candidate text".to_string()))
    }
}

#[async_trait]
impl SummaryModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = build_request(prompt, &self.config);
        with_retry("summarization request", &self.retry, || {
            self.run_generate(&body)
        })
        .await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Assemble one generation request body
fn build_request(prompt: &str, config: &GeminiConfig) -> Value {
    let safety_settings: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
        .collect();

    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": config.temperature,
            "maxOutputTokens": config.max_output_tokens,
        },
        "safetySettings": safety_settings,
    })
}

/// Concatenate the text parts of the first candidate
fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload.pointer("/candidates/0/content/parts")?.as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
