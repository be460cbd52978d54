// src/web/form.rs
//! The query form: field validation, shareable links, and error composition.

use crate::api::QueryRequest;
use crate::constants::{FILTER_PARAM, TOKEN_PARAM};
use crate::types::ValidatedUrl;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::{Position, Url};

/// Raw form submission. Missing fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryForm {
    pub database_id: String,
    pub api_key: String,
    pub filter: String,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors {
    pub database_id: Option<String>,
    pub api_key: Option<String>,
    pub filter: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.database_id.is_none() && self.api_key.is_none() && self.filter.is_none()
    }
}

impl QueryForm {
    /// Applies the field rules; `Ok` carries the request to relay.
    pub fn validate(&self) -> Result<QueryRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.database_id.trim().is_empty() {
            errors.database_id = Some("Database ID is required.".to_string());
        }
        if self.api_key.trim().is_empty() {
            errors.api_key = Some("API Key is required.".to_string());
        }
        if !filter_is_acceptable(&self.filter) {
            errors.filter = Some("Query parameters must be valid JSON or empty.".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(QueryRequest::new(
            self.database_id.trim(),
            self.api_key.trim(),
            self.non_blank_filter().map(str::to_string),
        ))
    }

    pub fn non_blank_filter(&self) -> Option<&str> {
        let trimmed = self.filter.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

fn filter_is_acceptable(filter: &str) -> bool {
    filter.trim().is_empty() || serde_json::from_str::<Value>(filter).is_ok()
}

/// Links that reproduce a query on each surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewLinks {
    pub table_view: String,
    pub json_view: String,
    pub api: String,
}

/// Base the relative links are resolved against before being cut back down.
const RELATIVE_BASE: &str = "http://relative.invalid/";

impl ViewLinks {
    /// Builds links for a query. The filter is included only when it is
    /// non-blank valid JSON. Links are root-relative unless `public_base`
    /// is given.
    pub fn build(
        public_base: Option<&ValidatedUrl>,
        database_id: &str,
        api_key: &str,
        filter: Option<&str>,
    ) -> Self {
        let filter = filter
            .map(str::trim)
            .filter(|f| !f.is_empty() && filter_is_acceptable(f));

        let link = |prefix: &[&str]| -> String {
            let base = public_base.map(|b| b.as_url().clone());
            let relative = base.is_none();
            let mut url = match base {
                Some(url) => url,
                None => match Url::parse(RELATIVE_BASE) {
                    Ok(url) => url,
                    Err(_) => return String::new(),
                },
            };

            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().extend(prefix).push(database_id);
            }
            {
                let mut query = url.query_pairs_mut();
                query.append_pair(TOKEN_PARAM, api_key);
                if let Some(filter) = filter {
                    query.append_pair(FILTER_PARAM, filter);
                }
            }

            if relative {
                url[Position::BeforePath..].to_string()
            } else {
                url.to_string()
            }
        };

        Self {
            table_view: link(&["table-view", "ndb"]),
            json_view: link(&["view", "ndb"]),
            api: link(&["api", "notion_database"]),
        }
    }
}

/// Message shown when the validation query fails:
/// `{error}: {details.message} (Code: {details.code})`.
///
/// Without a detail message, the compact details JSON is appended instead,
/// unless it is `{}`.
pub fn compose_failure_message(error: &str, details: Option<&Value>) -> String {
    let Some(details) = details else {
        return error.to_string();
    };

    if let Some(message) = details.get("message").and_then(Value::as_str) {
        let mut composed = format!("{}: {}", error, message);
        if let Some(code) = details.get("code").filter(|c| !c.is_null()) {
            let code = code
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string());
            composed.push_str(&format!(" (Code: {})", code));
        }
        return composed;
    }

    match details {
        Value::String(s) => format!("{}: {}", error, s),
        other => {
            let compact = other.to_string();
            if compact == "{}" {
                error.to_string()
            } else {
                format!("{}: {}", error, compact)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form(database_id: &str, api_key: &str, filter: &str) -> QueryForm {
        QueryForm {
            database_id: database_id.into(),
            api_key: api_key.into(),
            filter: filter.into(),
        }
    }

    #[test]
    fn test_field_rules() {
        let errors = form("", " ", "{oops").validate().unwrap_err();
        assert_eq!(
            errors,
            FieldErrors {
                database_id: Some("Database ID is required.".into()),
                api_key: Some("API Key is required.".into()),
                filter: Some("Query parameters must be valid JSON or empty.".into()),
            }
        );
    }

    #[test]
    fn test_valid_form_becomes_request() {
        let request = form(" db1 ", "secret_x", "  ").validate().unwrap();
        assert_eq!(request, QueryRequest::new("db1", "secret_x", None));

        let request = form("db1", "secret_x", r#"{"page_size": 5}"#).validate().unwrap();
        assert_eq!(request.filter.as_deref(), Some(r#"{"page_size": 5}"#));
    }

    #[test]
    fn test_relative_links_encode_parts() {
        let links = ViewLinks::build(None, "a b/c", "secret&1", Some(r#"{"x": 1}"#));
        assert_eq!(
            links.table_view,
            "/table-view/ndb/a%20b%2Fc?api_key=secret%261&filter=%7B%22x%22%3A+1%7D"
        );
        assert!(links.json_view.starts_with("/view/ndb/a%20b%2Fc?api_key="));
        assert!(links.api.starts_with("/api/notion_database/a%20b%2Fc?"));
    }

    #[test]
    fn test_links_skip_blank_or_invalid_filter() {
        let links = ViewLinks::build(None, "db", "key", Some("  "));
        assert_eq!(links.json_view, "/view/ndb/db?api_key=key");
        let links = ViewLinks::build(None, "db", "key", Some("{nope"));
        assert_eq!(links.json_view, "/view/ndb/db?api_key=key");
    }

    #[test]
    fn test_absolute_links_with_public_base() {
        let base = ValidatedUrl::parse("https://tools.example.com/notion").unwrap();
        let links = ViewLinks::build(Some(&base), "db", "key", None);
        assert_eq!(
            links.table_view,
            "https://tools.example.com/notion/table-view/ndb/db?api_key=key"
        );
    }

    #[test]
    fn test_failure_message_composition() {
        assert_eq!(
            compose_failure_message(
                "Could not find database",
                Some(&json!({"message": "Could not find database", "code": "object_not_found", "status": 404}))
            ),
            "Could not find database: Could not find database (Code: object_not_found)"
        );
        assert_eq!(
            compose_failure_message("API Error: 502", Some(&json!({"status": 502, "body": "Bad Gateway"}))),
            r#"API Error: 502: {"status":502,"body":"Bad Gateway"}"#
        );
        assert_eq!(compose_failure_message("Oops", Some(&json!({}))), "Oops");
        assert_eq!(
            compose_failure_message("Database ID and API Key are required.", None),
            "Database ID and API Key are required."
        );
    }
}
