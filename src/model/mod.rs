//! Notion rows as the renderer sees them.
//!
//! These types are built per request from a query response and never
//! persisted. Parsing is lenient: a row the renderer cannot make sense of
//! still yields a [`NotionPage`] with whatever properties it did carry.

mod property_value;

pub use property_value::{FormulaResult, PropertyValue, RollupResult};

use crate::types::PageId;
use indexmap::IndexMap;
use serde_json::Value;

/// A database row.
#[derive(Debug, Clone, PartialEq)]
pub struct NotionPage {
    pub id: PageId,
    /// Properties in the order Notion sent them.
    pub properties: IndexMap<String, PropertyValue>,
}

impl NotionPage {
    pub fn from_json(raw: &Value) -> Self {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let properties = raw
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, value)| (name.clone(), PropertyValue::from_json(value)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: PageId::from_normalized(id),
            properties,
        }
    }
}

/// The parts of a `databases/{id}/query` response the table view uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResponse {
    pub results: Vec<NotionPage>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl QueryResponse {
    pub fn from_payload(payload: &Value) -> Self {
        let results = payload
            .get("results")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(NotionPage::from_json).collect())
            .unwrap_or_default();

        Self {
            results,
            has_more: payload
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            next_cursor: payload
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_property_order_follows_payload() {
        let page = NotionPage::from_json(&json!({
            "object": "page",
            "id": "p1",
            "properties": {
                "Zeta": {"type": "checkbox", "checkbox": false},
                "Alpha": {"type": "number", "number": 1},
                "Mid": {"type": "url", "url": null}
            }
        }));
        assert_eq!(page.id.as_str(), "p1");
        let names: Vec<&str> = page.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_query_response_is_lenient() {
        let response = QueryResponse::from_payload(&json!({
            "object": "list",
            "results": [{"id": "p1"}, "not a page"],
            "has_more": true,
            "next_cursor": "abc"
        }));
        assert_eq!(response.results.len(), 2);
        assert!(response.results[1].properties.is_empty());
        assert!(response.has_more);
        assert_eq!(response.next_cursor.as_deref(), Some("abc"));

        let empty = QueryResponse::from_payload(&json!({"message": "nothing here"}));
        assert_eq!(empty, QueryResponse::default());
    }
}
