//! Content-aware relevance ranking
//!
//! Additive heuristic, not a probabilistic model: structural field hits
//! outweigh body matches, and the body contribution is capped so a
//! keyword-stuffed note cannot win on repetition alone.

use crate::document::Document;
use chrono::{DateTime, NaiveDate, Utc};

/// Points for a query keyword appearing in the title
const TITLE_POINTS: u32 = 10;

/// Points for a query keyword appearing in the tags
const TAGS_POINTS: u32 = 5;

/// Points for a query keyword appearing in the category
const CATEGORY_POINTS: u32 = 5;

/// Points per body-text occurrence of the query
const CONTENT_POINTS_PER_MATCH: u32 = 2;

/// Cap on the body-text contribution
const CONTENT_POINTS_CAP: u32 = 8;

/// Score, order, and cut a candidate set for one query.
///
/// Zero-score documents are dropped. Ties in score break on date, most
/// recent first; documents whose date does not parse sort last. The query
/// is treated as literal text throughout, never as a pattern.
pub fn rank_by_relevance(query: &str, documents: Vec<Document>, limit: usize) -> Vec<Document> {
    let needle = query.to_lowercase();
    let keywords: Vec<&str> = needle.split_whitespace().collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<Document> = documents
        .into_iter()
        .filter_map(|mut doc| {
            let score = relevance_score(&doc, &needle, &keywords);
            if score == 0 {
                return None;
            }
            doc.score = Some(score);
            Some(doc)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| date_key(&b.date).cmp(&date_key(&a.date)))
    });
    ranked.truncate(limit);
    ranked
}

fn relevance_score(doc: &Document, needle: &str, keywords: &[&str]) -> u32 {
    let mut score = 0;

    if field_matches(&doc.title, keywords) {
        score += TITLE_POINTS;
    }
    if field_matches(&doc.tags, keywords) {
        score += TAGS_POINTS;
    }
    if field_matches(&doc.category, keywords) {
        score += CATEGORY_POINTS;
    }

    let occurrences = count_occurrences(&doc.content.to_lowercase(), needle) as u32;
    score + (occurrences * CONTENT_POINTS_PER_MATCH).min(CONTENT_POINTS_CAP)
}

/// True when any query keyword appears in the field, case-insensitively
fn field_matches(field: &str, keywords: &[&str]) -> bool {
    if field.is_empty() {
        return false;
    }
    let lower = field.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Non-overlapping literal occurrences of `needle` in `haystack`
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut offset = 0;
    while let Some(found) = haystack[offset..].find(needle) {
        count += 1;
        offset += found + needle.len();
    }
    count
}

/// Comparable key for date tie-breaks; `None` for unparsable dates
fn date_key(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
