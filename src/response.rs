//! Turning webhook response bodies into chat replies.
//!
//! Workflow webhooks answer in a few shapes: a JSON array of items
//! (`[{"output": "..."}]`), a flat JSON object (`{"response": "..."}`), or
//! plain text. The reply text is pulled out here; rendering happens later.

use serde_json::Value;

const ITEM_FIELDS: [&str; 4] = ["output", "response", "message", "text"];
const OBJECT_FIELDS: [&str; 4] = ["response", "message", "output", "text"];

/// Text of one assistant reply plus whatever metadata the webhook attached
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub metadata: Option<Value>,
}

impl Reply {
    pub fn from_text(body: impl Into<String>) -> Self {
        Self {
            content: body.into(),
            metadata: None,
        }
    }

    pub fn from_json(body: &Value) -> Self {
        match body {
            Value::Array(items) if !items.is_empty() => Self::from_item(&items[0], &ITEM_FIELDS),
            other => Self::from_item(other, &OBJECT_FIELDS),
        }
    }

    /// Pick the parser by content type, like a browser `fetch` caller would.
    pub fn from_body(content_type: Option<&str>, body: &str) -> crate::Result<Self> {
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        if is_json {
            let value: Value = serde_json::from_str(body)?;
            Ok(Self::from_json(&value))
        } else {
            Ok(Self::from_text(body))
        }
    }

    fn from_item(item: &Value, fields: &[&str]) -> Self {
        let content = fields
            .iter()
            .find_map(|field| item.get(field).and_then(truthy_text))
            .unwrap_or_else(|| item.to_string());
        let metadata = item
            .get("metadata")
            .filter(|meta| !meta.is_null())
            .cloned();
        Self { content, metadata }
    }

    /// One-line summary of `source` and `confidence`, if either is present
    pub fn metadata_summary(&self) -> Option<String> {
        metadata_summary(self.metadata.as_ref()?)
    }
}

pub fn metadata_summary(metadata: &Value) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(source) = metadata.get("source").and_then(truthy_text) {
        parts.push(format!("Source: {source}"));
    }
    if let Some(confidence) = metadata.get("confidence").and_then(truthy_text) {
        parts.push(format!("Confidence: {confidence}"));
    }
    (!parts.is_empty()).then(|| parts.join(" • "))
}

/// Strings come back as-is, other non-empty values JSON-encoded.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
