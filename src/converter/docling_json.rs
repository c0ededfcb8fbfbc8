//! Best-effort reads from a Docling JSON export.
//!
//! The JSON document is treated as untrusted and loosely shaped: every
//! accessor returns `None` when a field is missing or has the wrong type.

use serde_json::Value;

/// Parse a Docling JSON export, or `None` if it is not JSON.
pub fn parse(bytes: &[u8]) -> Option<Value> {
    serde_json::from_slice(bytes).ok()
}

/// Number of pages, from the `pages` map (or array). Formats without pages
/// (Word, HTML, text) report an empty map, which yields `None`.
pub fn page_count(doc: &Value) -> Option<u32> {
    let n = match doc.get("pages")? {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => return None,
    };
    if n == 0 {
        None
    } else {
        u32::try_from(n).ok()
    }
}

/// Text of the first item labelled `title`.
pub fn title(doc: &Value) -> Option<String> {
    doc.get("texts")?
        .as_array()?
        .iter()
        .filter(|item| item.get("label").and_then(Value::as_str) == Some("title"))
        .find_map(item_text)
}

/// Markdown rebuilt from the plain text items, used when the Markdown export
/// is missing. Returns `None` when there is no text at all.
pub fn texts_as_markdown(doc: &Value) -> Option<String> {
    let parts: Vec<String> = doc
        .get("texts")?
        .as_array()?
        .iter()
        .filter_map(item_text)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn item_text(item: &Value) -> Option<String> {
    let text = item.get("text")?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "report",
            "pages": { "1": { "page_no": 1 }, "2": { "page_no": 2 } },
            "texts": [
                { "label": "page_header", "text": "ACME Corp" },
                { "label": "title", "text": "  Quarterly Report  " },
                { "label": "text", "text": "" },
                { "label": "text", "text": "Revenue grew." }
            ]
        })
    }

    #[test]
    fn reads_page_count_and_title() {
        let doc = sample();
        assert_eq!(page_count(&doc), Some(2));
        assert_eq!(title(&doc).as_deref(), Some("Quarterly Report"));
    }

    #[test]
    fn rebuilds_markdown_from_texts() {
        assert_eq!(
            texts_as_markdown(&sample()).as_deref(),
            Some("ACME Corp\n\nQuarterly Report\n\nRevenue grew.")
        );
    }

    #[test]
    fn missing_fields_are_absent() {
        let doc = json!({ "pages": {}, "texts": "not an array" });
        assert_eq!(page_count(&doc), None);
        assert_eq!(title(&doc), None);
        assert_eq!(texts_as_markdown(&doc), None);
        assert_eq!(page_count(&json!(42)), None);
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse(b"%PDF-1.7").is_none());
        assert!(parse(br#"{"pages":[1,2,3]}"#).is_some());
        assert_eq!(page_count(&parse(br#"{"pages":[1,2,3]}"#).unwrap()), Some(3));
    }
}
