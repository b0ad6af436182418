//! Model response parsing
//!
//! Model output varies: sometimes a tagged fence, sometimes a bare fence,
//! sometimes JSON buried in prose. Extraction tolerates all of them, and
//! the validators are total - any JSON value in, a fully-populated result
//! out.

use crate::error::{DigestError, Result};
use crate::summary::{OlderRecords, RecentRecord, Relevance, SummaryResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Summary text substituted when the model leaves the field out
const MISSING_SUMMARY: &str = "No summary provided.";

lazy_static! {
    static ref JSON_FENCE: Regex = Regex::new(r"(?i)```json\s*([\s\S]*?)```").unwrap();
    static ref ANY_FENCE: Regex = Regex::new(r"```[a-zA-Z]*\s*([\s\S]*?)```").unwrap();
}

/// Pull the JSON payload out of free-form model text.
///
/// Tried in order: a fence tagged as JSON, any fence, the outermost brace
/// span, then the whole trimmed text if it already parses.
pub fn extract_json(raw: &str) -> Result<String> {
    if let Some(caps) = JSON_FENCE.captures(raw) {
        return Ok(caps[1].trim().to_string());
    }
    if let Some(caps) = ANY_FENCE.captures(raw) {
        return Ok(caps[1].trim().to_string());
    }
    if let Some(start) = raw.find('{') {
        if let Some(end) = raw.rfind('}') {
            if end > start {
                return Ok(raw[start..=end].to_string());
            }
        }
    }

    let trimmed = raw.trim();
    if !trimmed.is_empty() && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    Err(DigestError::JsonExtraction)
}

/// Coerce whatever the model produced into a [`SummaryResult`].
///
/// Total: every missing or mistyped field gets a safe default, and
/// relevance grades outside the vocabulary become medium.
pub fn validate_query_result(parsed: &Value) -> SummaryResult {
    let recent_records = parsed
        .get("recentRecords")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(recent_record).collect())
        .unwrap_or_default();

    let older = parsed.get("olderRecords");
    let older_records = OlderRecords {
        count: older
            .and_then(|older| older.get("count"))
            .and_then(Value::as_u64)
            .map(|count| count.min(u32::MAX as u64) as u32)
            .unwrap_or(0),
        period: read_text(older, "period"),
        summary: read_text(older, "summary"),
    };

    SummaryResult {
        summary: summary_text(parsed),
        recent_records,
        older_records,
        no_data: parsed
            .get("noData")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Coerce a period response into its summary text
pub fn validate_period_result(parsed: &Value) -> String {
    summary_text(parsed)
}

/// Parse a raw query-summarization response, degrading to the fallback
/// result when it is unusable
pub fn query_summary(raw: &str) -> SummaryResult {
    match parse_payload(raw) {
        Ok(value) => validate_query_result(&value),
        Err(err) => {
            tracing::warn!("query summary response was unusable: {}", err);
            tracing::debug!("raw model response: {}", raw);
            SummaryResult::failed()
        }
    }
}

/// Parse a raw period-summarization response; `None` means unusable
pub fn period_summary(raw: &str) -> Option<String> {
    match parse_payload(raw) {
        Ok(value) => Some(validate_period_result(&value)),
        Err(err) => {
            tracing::warn!("period summary response was unusable: {}", err);
            tracing::debug!("raw model response: {}", raw);
            None
        }
    }
}

fn parse_payload(raw: &str) -> Result<Value> {
    let json = extract_json(raw)?;
    serde_json::from_str(&json).map_err(|err| {
        tracing::debug!("extracted text failed to parse: {}", err);
        DigestError::MalformedSummary
    })
}

fn recent_record(item: &Value) -> RecentRecord {
    RecentRecord {
        date: read_text(Some(item), "date"),
        title: read_text(Some(item), "title"),
        content: read_text(Some(item), "content"),
        relevance: Relevance::coerce(item.get("relevance").and_then(Value::as_str)),
    }
}

fn summary_text(parsed: &Value) -> String {
    parsed
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_SUMMARY.to_string())
}

fn read_text(value: Option<&Value>, key: &str) -> String {
    value
        .and_then(|value| value.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn tagged_fence_wins() {
        let raw = "Here is the result:\n```json\n{\"summary\":\"x\"}\n```";
        assert_eq!(extract_json(raw).unwrap(), "{\"summary\":\"x\"}");
    }

    #[test]
    fn untagged_fence_is_second_choice() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn brace_span_is_third_choice() {
        let raw = "The answer is {\"a\": {\"b\": 2}} as requested.";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn bare_json_passes_through() {
        assert_eq!(extract_json("  {\"a\":1}  ").unwrap(), "{\"a\":1}");
        // no braces at all, but the trimmed text parses outright
        assert_eq!(extract_json("[1, 2, 3]").unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn plain_prose_is_rejected() {
        assert!(matches!(
            extract_json("I could not find anything relevant."),
            Err(DigestError::JsonExtraction)
        ));
        assert!(matches!(
            extract_json(""),
            Err(DigestError::JsonExtraction)
        ));
    }

    fn round_trips(raw: &str, expected: &Value) {
        let extracted = extract_json(raw).unwrap();
        let parsed: Value = serde_json::from_str(&extracted).unwrap();
        assert_eq!(&parsed, expected);
    }

    #[test]
    fn extraction_round_trips_all_three_embeddings() {
        let object = json!({"summary": "x", "noData": false});
        let body = serde_json::to_string(&object).unwrap();

        round_trips(&format!("prefix\n```json\n{}\n``` suffix", body), &object);
        round_trips(&format!("```\n{}\n```", body), &object);
        round_trips(&body, &object);
    }

    #[test]
    fn complete_response_is_validated_field_by_field() {
        let parsed = json!({
            "summary": "Found three notes about sourdough.",
            "recentRecords": [
                {"date": "2024-03-01", "title": "Starter", "content": "fed it", "relevance": "high"},
                {"date": "2024-02-28", "title": "Bake", "content": "good crumb", "relevance": "bogus"},
            ],
            "olderRecords": {"count": 4, "period": "2023", "summary": "older bakes"},
            "noData": false,
        });

        let result = validate_query_result(&parsed);

        assert_eq!(result.summary, "Found three notes about sourdough.");
        assert_eq!(result.recent_records.len(), 2);
        assert_eq!(result.recent_records[0].relevance, Relevance::High);
        // out-of-vocabulary grade coerces to medium
        assert_eq!(result.recent_records[1].relevance, Relevance::Medium);
        assert_eq!(result.older_records.count, 4);
        assert!(!result.no_data);
    }

    #[test]
    fn empty_object_validates_to_defaults() {
        let result = validate_query_result(&json!({}));

        assert_eq!(result.summary, MISSING_SUMMARY);
        assert!(result.recent_records.is_empty());
        assert_eq!(result.older_records, OlderRecords::default());
        assert!(!result.no_data);
    }

    #[test]
    fn mistyped_fields_fall_back() {
        let parsed = json!({
            "summary": 42,
            "recentRecords": "not an array",
            "olderRecords": {"count": -3, "period": 7},
            "noData": "yes",
        });

        let result = validate_query_result(&parsed);

        assert_eq!(result.summary, MISSING_SUMMARY);
        assert!(result.recent_records.is_empty());
        assert_eq!(result.older_records.count, 0);
        assert_eq!(result.older_records.period, "");
        assert!(!result.no_data);
    }

    #[test]
    fn validation_is_total_over_non_objects() {
        for value in [json!(null), json!([1, 2]), json!("text"), json!(3.5)] {
            let result = validate_query_result(&value);
            assert_eq!(result.summary, MISSING_SUMMARY);
            assert!(result.recent_records.is_empty());
        }
    }

    #[test]
    fn query_summary_parses_a_fenced_response() {
        let raw = "```json\n{\"summary\":\"all good\",\"noData\":false}\n```";
        let result = query_summary(raw);

        assert_eq!(result.summary, "all good");
        assert!(!result.no_data);
    }

    #[test]
    fn query_summary_degrades_instead_of_erroring() {
        let result = query_summary("no json anywhere");
        assert_eq!(result, SummaryResult::failed());

        // extraction succeeds but the captured text is not JSON
        let result = query_summary("```json\nnot: valid: json\n```");
        assert_eq!(result, SummaryResult::failed());
    }

    #[test]
    fn period_summary_reads_the_single_field() {
        assert_eq!(
            period_summary("{\"summary\": \"## Week\\nquiet\"}"),
            Some("## Week\nquiet".to_string())
        );
        assert_eq!(
            period_summary("{\"noSummaryHere\": true}"),
            Some(MISSING_SUMMARY.to_string())
        );
        assert_eq!(period_summary("total garbage"), None);
    }

    proptest! {
        /// Any JSON value validates to a result whose re-validation is a
        /// fixed point.
        #[test]
        fn validation_is_total_and_idempotent(raw in arbitrary_json(3)) {
            let first = validate_query_result(&raw);

            for record in &first.recent_records {
                prop_assert!(matches!(
                    record.relevance,
                    Relevance::High | Relevance::Medium | Relevance::Low
                ));
            }
            prop_assert!(!first.summary.is_empty());

            let reencoded = serde_json::to_value(&first).unwrap();
            let second = validate_query_result(&reencoded);
            prop_assert_eq!(first, second);
        }
    }

    fn arbitrary_json(depth: u32) -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<u32>().prop_map(|n| json!(n)),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(depth, 24, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::hash_map(
                    prop_oneof![
                        Just("summary".to_string()),
                        Just("recentRecords".to_string()),
                        Just("olderRecords".to_string()),
                        Just("noData".to_string()),
                        Just("relevance".to_string()),
                        "[a-z]{1,8}",
                    ],
                    inner,
                    0..4
                )
                .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }
}
