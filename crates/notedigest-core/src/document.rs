//! Document model
//!
//! One store record, normalized. Structural fields are fixed at mapping
//! time; `content` and `score` are filled by later enrichment passes
//! (body fetch, then ranking).

use crate::error::{DigestError, Result};
use crate::notion::query::{PROP_CATEGORY, PROP_DATE, PROP_IMPORTANCE, PROP_TAGS, PROP_TITLE};
use serde::Serialize;
use serde_json::Value;

/// Title substituted when a record carries none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Importance vocabulary, ordered highest first
pub const IMPORTANCE_LEVELS: &[&str] = &["highest", "high", "medium", "low"];

/// Content cap applied when body text is extracted from blocks
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Cap on the joined tags string
pub const MAX_TAGS_CHARS: usize = 500;

pub(crate) const PLACEHOLDER_TITLE: &str = "Error loading record";

/// One document-store record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub importance: String,
    pub tags: String,
    pub date: String,
    pub created_time: String,
    pub last_edited_time: String,
    pub url: String,
    /// Relevance score, present only after ranking
    pub score: Option<u32>,
}

impl Document {
    /// Create a document with only id and title set
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            category: String::new(),
            importance: String::new(),
            tags: String::new(),
            date: String::new(),
            created_time: String::new(),
            last_edited_time: String::new(),
            url: String::new(),
            score: None,
        }
    }

    /// Stand-in for a record that failed to map; carries an error marker
    /// instead of aborting the batch
    pub fn placeholder(id: impl Into<String>) -> Self {
        let mut doc = Self::new(id, PLACEHOLDER_TITLE);
        doc.content = "This record could not be read.".to_string();
        doc
    }

    /// True when this document stands in for an unmappable record
    pub fn is_placeholder(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }

    /// Map one raw store page into a document.
    ///
    /// Only structural fields are read; `content` stays empty until the
    /// body is fetched. Missing properties fall back to defaults, so the
    /// only hard failure is a record without a usable id.
    pub fn from_page(page: &Value) -> Result<Self> {
        let id = page
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DigestError::Parse("record has no id".to_string()))?;

        let props = page.get("properties");
        let created_time = text_at(page, "created_time");

        Ok(Self {
            id: id.to_string(),
            title: read_title(props).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: String::new(),
            category: read_select(props, PROP_CATEGORY).unwrap_or_default(),
            importance: read_select(props, PROP_IMPORTANCE).unwrap_or_default(),
            tags: truncate_chars(&read_tags(props).join(", "), MAX_TAGS_CHARS),
            // explicit date property, else when the record was created
            date: read_date(props).unwrap_or_else(|| created_time.clone()),
            created_time,
            last_edited_time: text_at(page, "last_edited_time"),
            url: text_at(page, "url"),
            score: None,
        })
    }
}

fn prop<'a>(props: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    props?.get(name)
}

fn read_title(props: Option<&Value>) -> Option<String> {
    let segments = prop(props, PROP_TITLE)?.get("title")?.as_array()?;
    let title: String = segments
        .iter()
        .filter_map(|segment| segment.get("plain_text").and_then(Value::as_str))
        .collect();
    let title = title.trim().to_string();
    (!title.is_empty()).then_some(title)
}

fn read_select(props: Option<&Value>, name: &str) -> Option<String> {
    prop(props, name)?
        .get("select")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

fn read_tags(props: Option<&Value>) -> Vec<String> {
    prop(props, PROP_TAGS)
        .and_then(|tags| tags.get("multi_select"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn read_date(props: Option<&Value>) -> Option<String> {
    prop(props, PROP_DATE)?
        .get("date")?
        .get("start")?
        .as_str()
        .map(str::to_string)
}

fn text_at(page: &Value, key: &str) -> String {
    page.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Truncate a string to at most `max` characters, on a char boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> Value {
        json!({
            "id": "page-1",
            "created_time": "2024-02-01T08:00:00.000Z",
            "last_edited_time": "2024-03-05T10:30:00.000Z",
            "url": "https://notes.example.com/page-1",
            "properties": {
                "Name": { "title": [
                    { "plain_text": "Weekly " },
                    { "plain_text": "review" },
                ]},
                "Category": { "select": { "name": "work" } },
                "Importance": { "select": { "name": "high" } },
                "Tags": { "multi_select": [
                    { "name": "planning" },
                    { "name": "team" },
                ]},
                "Date": { "date": { "start": "2024-03-04" } },
            },
        })
    }

    #[test]
    fn structural_fields_are_mapped() {
        let doc = Document::from_page(&sample_page()).unwrap();

        assert_eq!(doc.id, "page-1");
        assert_eq!(doc.title, "Weekly review");
        assert_eq!(doc.category, "work");
        assert_eq!(doc.importance, "high");
        assert_eq!(doc.tags, "planning, team");
        assert_eq!(doc.date, "2024-03-04");
        assert_eq!(doc.created_time, "2024-02-01T08:00:00.000Z");
        assert_eq!(doc.url, "https://notes.example.com/page-1");
        assert!(doc.content.is_empty());
        assert!(doc.score.is_none());
    }

    #[test]
    fn missing_title_falls_back_to_placeholder() {
        let mut page = sample_page();
        page["properties"]
            .as_object_mut()
            .unwrap()
            .remove("Name");

        let doc = Document::from_page(&page).unwrap();
        assert_eq!(doc.title, DEFAULT_TITLE);

        page["properties"]["Name"] = json!({ "title": [{ "plain_text": "   " }] });
        let doc = Document::from_page(&page).unwrap();
        assert_eq!(doc.title, DEFAULT_TITLE);
    }

    #[test]
    fn missing_date_falls_back_to_created_time() {
        let mut page = sample_page();
        page["properties"]
            .as_object_mut()
            .unwrap()
            .remove("Date");

        let doc = Document::from_page(&page).unwrap();
        assert_eq!(doc.date, "2024-02-01T08:00:00.000Z");
    }

    #[test]
    fn optional_selects_default_to_empty() {
        let page = json!({ "id": "bare", "properties": {} });
        let doc = Document::from_page(&page).unwrap();

        assert_eq!(doc.category, "");
        assert_eq!(doc.importance, "");
        assert_eq!(doc.tags, "");
        assert_eq!(doc.date, "");
    }

    #[test]
    fn record_without_id_fails_to_map() {
        assert!(Document::from_page(&json!({ "properties": {} })).is_err());
        assert!(Document::from_page(&json!({ "id": "" })).is_err());
        assert!(Document::from_page(&json!("not an object")).is_err());
    }

    #[test]
    fn long_tag_lists_are_capped() {
        let mut page = sample_page();
        let tags: Vec<Value> = (0..100)
            .map(|n| json!({ "name": format!("tag-number-{:03}", n) }))
            .collect();
        page["properties"]["Tags"] = json!({ "multi_select": tags });

        let doc = Document::from_page(&page).unwrap();
        assert!(doc.tags.chars().count() <= MAX_TAGS_CHARS);
    }

    #[test]
    fn placeholder_is_detectable() {
        let doc = Document::placeholder("abc");
        assert!(doc.is_placeholder());
        assert!(!doc.content.is_empty());

        let normal = Document::new("abc", "Weekly plan");
        assert!(!normal.is_placeholder());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // multibyte: each kana is one char, three bytes
        assert_eq!(truncate_chars("ノートまとめ", 3), "ノート");
        assert_eq!(truncate_chars("", 5), "");
    }
}
