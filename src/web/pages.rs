// src/web/pages.rs
//! HTML pages rendered through Handlebars.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars escapes `{{value}}` output; only pre-escaped cell HTML is
//! emitted with triple braces.

use crate::api::QueryResult;
use crate::error::AppError;
use crate::formatting::{format_fetched_at, pretty_json, Table, TableBuilder};
use crate::model::QueryResponse;
use handlebars::Handlebars;
use serde::Serialize;

use super::form::{FieldErrors, ViewLinks};

const TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("../../templates/index.hbs")),
    ("table_view", include_str!("../../templates/table_view.hbs")),
    ("raw_view", include_str!("../../templates/raw_view.hbs")),
];

const PARTIALS: &[(&str, &str)] = &[
    ("head", include_str!("../../templates/partials/head.hbs")),
    ("error_panel", include_str!("../../templates/partials/error_panel.hbs")),
];

/// Compiled page templates.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();

        for (name, source) in PARTIALS {
            registry
                .register_partial(name, *source)
                .map_err(|e| AppError::TemplateRegistration {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, *source)
                .map_err(|e| AppError::TemplateRegistration {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        log::debug!(
            "Registered {} page templates and {} partials",
            TEMPLATES.len(),
            PARTIALS.len()
        );
        Ok(Self { registry })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, AppError> {
        self.registry
            .render(name, data)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    pub fn index(&self, page: &IndexPage) -> Result<String, AppError> {
        self.render("index", page)
    }

    pub fn table_view(&self, page: &TableViewPage) -> Result<String, AppError> {
        self.render("table_view", page)
    }

    pub fn raw_view(&self, page: &RawViewPage) -> Result<String, AppError> {
        self.render("raw_view", page)
    }
}

/// Message plus optional pretty-printed details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPanel {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorPanel {
    pub fn from_result(result: &QueryResult) -> Option<Self> {
        result.error().map(|error| Self {
            title: "Query Error".to_string(),
            message: error.to_string(),
            details: error.details().as_ref().map(pretty_json),
        })
    }

    /// Panel for a request rejected before any query was attempted.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

// --- Query form ---

/// Outcome banner after a form submission reached the relay.
#[derive(Debug, Clone, Serialize)]
pub struct FormOutcome {
    pub success: bool,
    pub title: String,
    pub message: String,
    pub links: Option<ViewLinks>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexPage {
    pub database_id: String,
    /// The token is never echoed back into the form.
    pub filter: String,
    pub errors: FieldErrors,
    pub outcome: Option<FormOutcome>,
    pub example_filter: &'static str,
}

pub const EXAMPLE_FILTER: &str =
    r#"{ "filter": { "property": "Status", "select": { "equals": "Done" } } }"#;

impl IndexPage {
    pub fn blank() -> Self {
        Self {
            example_filter: EXAMPLE_FILTER,
            ..Self::default()
        }
    }
}

// --- Table view ---

#[derive(Debug, Clone, Serialize)]
pub struct TableViewPage {
    pub database_id: String,
    pub filter: Option<String>,
    pub fetched_at: Option<String>,
    pub error: Option<ErrorPanel>,
    pub table: Option<Table>,
    pub row_count: usize,
    pub column_count: usize,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl TableViewPage {
    pub fn rejected(database_id: &str, filter: Option<String>, message: &str) -> Self {
        Self {
            database_id: database_id.to_string(),
            filter,
            fetched_at: None,
            error: Some(ErrorPanel::rejected(message)),
            table: None,
            row_count: 0,
            column_count: 0,
            has_more: false,
            next_cursor: None,
        }
    }

    pub fn from_result(database_id: &str, filter: Option<String>, result: &QueryResult) -> Self {
        let mut page = Self {
            database_id: database_id.to_string(),
            filter,
            fetched_at: Some(format_fetched_at(&result.fetched_at())),
            error: ErrorPanel::from_result(result),
            table: None,
            row_count: 0,
            column_count: 0,
            has_more: false,
            next_cursor: None,
        };

        if let Some(payload) = result.payload() {
            let response = QueryResponse::from_payload(payload);
            let table = TableBuilder::new(&response.results).build();
            page.row_count = table.row_count();
            page.column_count = table.column_count();
            page.has_more = response.has_more;
            page.next_cursor = response.next_cursor;
            if !table.is_empty() {
                page.table = Some(table);
            }
        }

        page
    }
}

// --- Raw JSON view ---

#[derive(Debug, Clone, Serialize)]
pub struct RawViewPage {
    pub title: String,
    pub database_id: String,
    pub error: Option<ErrorPanel>,
    pub json: Option<String>,
}

impl RawViewPage {
    pub fn rejected(database_id: &str, message: &str) -> Self {
        Self {
            title: format!("Error Querying: {}", database_id),
            database_id: database_id.to_string(),
            error: Some(ErrorPanel::rejected(message)),
            json: None,
        }
    }

    pub fn from_result(database_id: &str, result: &QueryResult) -> Self {
        match ErrorPanel::from_result(result) {
            Some(panel) => Self {
                title: format!("Error Querying: {}", database_id),
                database_id: database_id.to_string(),
                error: Some(panel),
                json: None,
            },
            None => Self {
                title: format!("Notion DB: {}", database_id),
                database_id: database_id.to_string(),
                error: None,
                json: Some(pretty_json(&result.to_json())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotionErrorCode, QueryError};
    use chrono::Utc;
    use serde_json::json;

    fn success(payload: serde_json::Value) -> QueryResult {
        QueryResult::Success {
            payload,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_templates_register() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_index_page_renders_help_and_errors() {
        let renderer = PageRenderer::new().unwrap();
        let mut page = IndexPage::blank();
        page.database_id = "<db>".into();
        page.errors.api_key = Some("API Key is required.".into());

        let html = renderer.index(&page).unwrap();
        assert!(html.contains("Notion Query Tool"));
        assert!(html.contains("How to Get Started"));
        assert!(html.contains("API Key is required."));
        assert!(html.contains("&lt;db&gt;"));
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
    }

    #[test]
    fn test_table_page_counts_and_has_more() {
        let renderer = PageRenderer::new().unwrap();
        let result = success(json!({
            "results": [{"id": "p1", "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "<Row>"}]}
            }}],
            "has_more": true,
            "next_cursor": "cur"
        }));
        let page = TableViewPage::from_result("db1", Some("{}".into()), &result);
        assert_eq!((page.row_count, page.column_count), (1, 1));

        let html = renderer.table_view(&page).unwrap();
        assert!(html.contains("Displaying 1 row(s) and 1 column(s)."));
        assert!(html.contains("&lt;Row&gt;"));
        assert!(!html.contains("<Row>"));
        assert!(html.contains("More results are available"));
        assert!(html.contains("Next cursor: <code>cur</code>"));
        assert!(html.contains("Data last refreshed:"));
    }

    #[test]
    fn test_table_page_without_rows_shows_no_data() {
        let renderer = PageRenderer::new().unwrap();
        let page = TableViewPage::from_result("db1", None, &success(json!({"results": []})));
        let html = renderer.table_view(&page).unwrap();
        assert!(html.contains("No Data"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_raw_page_failure_shows_details() {
        let renderer = PageRenderer::new().unwrap();
        let result = QueryResult::Failure {
            error: QueryError::UpstreamError {
                status: 401,
                code: NotionErrorCode::Unauthorized,
                body: json!({"message": "API token is invalid.", "code": "unauthorized"}),
            },
            fetched_at: Utc::now(),
        };
        let page = RawViewPage::from_result("db1", &result);
        assert_eq!(page.title, "Error Querying: db1");

        let html = renderer.raw_view(&page).unwrap();
        assert!(html.contains("Query Error"));
        assert!(html.contains("API token is invalid."));
        assert!(html.contains("&quot;status&quot;: 401"));
    }

    #[test]
    fn test_raw_page_success_pretty_prints() {
        let renderer = PageRenderer::new().unwrap();
        let page = RawViewPage::from_result("db1", &success(json!({"object": "list"})));
        assert_eq!(page.title, "Notion DB: db1");
        let html = renderer.raw_view(&page).unwrap();
        assert!(html.contains("&quot;object&quot;: &quot;list&quot;"));
        assert!(html.contains("dataFetchedAt"));
    }
}
