//! Block-tree text extraction

use crate::document::{truncate_chars, MAX_CONTENT_CHARS};
use serde_json::Value;

/// Block kinds whose rich text is extracted; anything else is skipped
const TEXT_BLOCK_KINDS: &[&str] = &[
    "paragraph",
    "heading_1",
    "heading_2",
    "heading_3",
    "bulleted_list_item",
    "numbered_list_item",
    "to_do",
    "toggle",
    "quote",
    "callout",
    "code",
];

/// Flatten a page's block list into plain text.
///
/// Unrecognized block kinds are dropped silently. Block texts are joined
/// with single spaces, trimmed, and capped at the document content limit.
pub fn extract_text(blocks: &[Value]) -> String {
    let mut parts: Vec<String> = Vec::new();

    for block in blocks {
        let Some(kind) = block.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !TEXT_BLOCK_KINDS.contains(&kind) {
            continue;
        }

        let Some(segments) = block
            .get(kind)
            .and_then(|body| body.get("rich_text"))
            .and_then(Value::as_array)
        else {
            continue;
        };

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get("plain_text").and_then(Value::as_str))
            .collect();
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
    }

    truncate_chars(parts.join(" ").trim(), MAX_CONTENT_CHARS)
}
