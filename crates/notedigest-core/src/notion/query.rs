//! Filter and sort builders for store queries
//!
//! Queries are expressed in the store's recursive filter grammar, so they
//! are assembled as JSON values rather than fixed request structs.

use crate::error::{DigestError, Result};
use crate::MAX_PAGE_SIZE;
use serde_json::{json, Value};

pub(crate) const PROP_TITLE: &str = "Name";
pub(crate) const PROP_CATEGORY: &str = "Category";
pub(crate) const PROP_IMPORTANCE: &str = "Importance";
pub(crate) const PROP_TAGS: &str = "Tags";
pub(crate) const PROP_DATE: &str = "Date";

/// Sort order for period queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Date,
    Importance,
}

impl Default for SortBy {
    fn default() -> Self {
        Self::Date
    }
}

/// Parameters for a period query
#[derive(Debug, Clone)]
pub struct PeriodQuery {
    /// Inclusive lower bound, ISO date
    pub start_date: String,
    pub importance: Option<Vec<String>>,
    pub category: Option<String>,
    pub limit: usize,
    pub sort_by: SortBy,
}

/// Build the multi-keyword search request body.
///
/// The query splits on whitespace; each keyword contributes three clauses
/// (title contains, tags contains, category equals) and every clause joins
/// one flat OR, so a document matches if any keyword matches any field.
/// Category is matched by exact equality, not containment.
pub fn multi_term_filter(query: &str, limit: usize) -> Result<Value> {
    let keywords: Vec<&str> = query.split_whitespace().collect();
    if keywords.is_empty() {
        return Err(DigestError::InvalidQuery(
            "query contains no searchable terms".to_string(),
        ));
    }

    let mut clauses = Vec::with_capacity(keywords.len() * 3);
    for keyword in &keywords {
        clauses.push(json!({ "property": PROP_TITLE, "title": { "contains": keyword } }));
        clauses.push(json!({ "property": PROP_TAGS, "multi_select": { "contains": keyword } }));
        clauses.push(json!({ "property": PROP_CATEGORY, "select": { "equals": keyword } }));
    }

    Ok(json!({
        "filter": { "or": clauses },
        "sorts": [
            { "property": PROP_DATE, "direction": "descending" },
            { "property": PROP_IMPORTANCE, "direction": "descending" },
        ],
        "page_size": limit.min(MAX_PAGE_SIZE),
    }))
}

/// Build the period request body: a mandatory on-or-after date predicate
/// plus optional importance and category predicates, AND-joined only when
/// more than one is present.
pub fn period_filter(params: &PeriodQuery) -> Value {
    let mut predicates = vec![json!({
        "property": PROP_DATE,
        "date": { "on_or_after": params.start_date },
    })];

    if let Some(levels) = &params.importance {
        match levels.as_slice() {
            [] => {}
            [only] => predicates.push(json!({
                "property": PROP_IMPORTANCE,
                "select": { "equals": only },
            })),
            many => {
                let options: Vec<Value> = many
                    .iter()
                    .map(|level| {
                        json!({ "property": PROP_IMPORTANCE, "select": { "equals": level } })
                    })
                    .collect();
                predicates.push(json!({ "or": options }));
            }
        }
    }

    if let Some(category) = &params.category {
        predicates.push(json!({
            "property": PROP_CATEGORY,
            "select": { "equals": category },
        }));
    }

    let filter = if predicates.len() == 1 {
        predicates.remove(0)
    } else {
        json!({ "and": predicates })
    };

    let sorts = match params.sort_by {
        SortBy::Importance => json!([
            { "property": PROP_IMPORTANCE, "direction": "descending" },
            { "property": PROP_DATE, "direction": "descending" },
        ]),
        SortBy::Date => json!([
            { "property": PROP_DATE, "direction": "descending" },
        ]),
    };

    json!({
        "filter": filter,
        "sorts": sorts,
        "page_size": params.limit.min(MAX_PAGE_SIZE),
    })
}
