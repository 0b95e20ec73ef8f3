use serde::Serialize;
use serde_json::Value;

use super::limiter::LimiterResult;

/// Metadata returned next to every payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMeta {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub summary_applied: bool,
    pub estimated_tokens: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub items: Vec<Value>,
    pub meta: ResponseMeta,
}

impl Envelope {
    pub fn new(limited: LimiterResult, next_cursor: Option<String>) -> Self {
        Self {
            meta: ResponseMeta {
                count: limited.items.len(),
                next_cursor,
                summary_applied: limited.summary_applied,
                estimated_tokens: limited.estimated_tokens,
            },
            items: limited.items,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::limiter::{LimiterConfig, limit_payload};
    use serde_json::json;

    #[test]
    fn meta_reflects_limiter_result() {
        let config = LimiterConfig::new(true, Some(vec!["id".into()]), 100).unwrap();
        let limited = limit_payload(vec![json!({"id": 1, "x": 2})], &config, &[]);
        let envelope = Envelope::new(limited, Some("next".into()));

        let value: Value = serde_json::from_str(&envelope.to_json()).unwrap();
        assert_eq!(value["items"], json!([{"id": 1}]));
        assert_eq!(value["meta"]["count"], 1);
        assert_eq!(value["meta"]["next_cursor"], "next");
        assert_eq!(value["meta"]["summary_applied"], true);
    }

    #[test]
    fn no_cursor_is_omitted() {
        let limited = limit_payload(Vec::new(), &LimiterConfig::default(), &[]);
        let value = serde_json::to_value(Envelope::new(limited, None)).unwrap();
        assert!(value["meta"].get("next_cursor").is_none());
        assert_eq!(value["meta"]["summary_applied"], false);
    }
}
