// src/api/relay.rs
//! One user query in, one normalized outcome out.
//!
//! The relay validates what the user typed, issues at most one upstream
//! call, and folds every failure into [`QueryResult::Failure`]. Nothing
//! here retries, paginates, or caches.

use super::NotionRepository;
use crate::constants::FETCHED_AT_KEY;
use crate::error::QueryError;
use crate::types::{ApiKey, DatabaseId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Raw user input for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    pub database_id: String,
    pub api_key: String,
    /// Filter text exactly as typed; parsed by the relay.
    pub filter: Option<String>,
}

impl QueryRequest {
    pub fn new(
        database_id: impl Into<String>,
        api_key: impl Into<String>,
        filter: Option<String>,
    ) -> Self {
        Self {
            database_id: database_id.into(),
            api_key: api_key.into(),
            filter,
        }
    }
}

/// Outcome of one relay attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Success {
        payload: Value,
        fetched_at: DateTime<Utc>,
    },
    Failure {
        error: QueryError,
        fetched_at: DateTime<Utc>,
    },
}

impl QueryResult {
    pub fn fetched_at(&self) -> DateTime<Utc> {
        match self {
            QueryResult::Success { fetched_at, .. } | QueryResult::Failure { fetched_at, .. } => {
                *fetched_at
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            QueryResult::Success { payload, .. } => Some(payload),
            QueryResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            QueryResult::Failure { error, .. } => Some(error),
            QueryResult::Success { .. } => None,
        }
    }

    /// User-facing failure message.
    pub fn message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// Opaque failure details, when the failure has any.
    pub fn details(&self) -> Option<Value> {
        self.error().and_then(QueryError::details)
    }

    /// HTTP status a surface should answer with.
    pub fn http_status(&self) -> u16 {
        match self.error() {
            None => 200,
            Some(error) => status_for_error(error),
        }
    }

    /// Fetch time as an ISO 8601 UTC string with millisecond precision.
    pub fn fetched_at_iso(&self) -> String {
        self.fetched_at()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// JSON body for the passthrough endpoint.
    ///
    /// Success is the upstream payload with the fetch time merged in; a
    /// payload that is not an object is nested under `payload`. Failure is
    /// `{error, details?, dataFetchedAt}`.
    pub fn to_json(&self) -> Value {
        let fetched_at = Value::String(self.fetched_at_iso());
        match self {
            QueryResult::Success { payload, .. } => {
                let mut body = match payload {
                    Value::Object(map) => map.clone(),
                    other => {
                        let mut map = Map::new();
                        map.insert("payload".to_string(), other.clone());
                        map
                    }
                };
                body.insert(FETCHED_AT_KEY.to_string(), fetched_at);
                Value::Object(body)
            }
            QueryResult::Failure { error, .. } => {
                let mut body = Map::new();
                body.insert("error".to_string(), Value::String(error.to_string()));
                if let Some(details) = error.details() {
                    body.insert("details".to_string(), details);
                }
                body.insert(FETCHED_AT_KEY.to_string(), fetched_at);
                Value::Object(body)
            }
        }
    }
}

/// Upstream status when known, 400 for bad input, else 500.
pub fn status_for_error(error: &QueryError) -> u16 {
    match error {
        QueryError::MissingCredentials | QueryError::InvalidFilterJson => 400,
        QueryError::UpstreamError { status, .. } => *status,
        QueryError::TransportError { .. } => 500,
    }
}

/// Parses the user's filter text into the outbound request body.
///
/// Missing or blank text, and any JSON value without keys (`null`, numbers,
/// booleans, `{}`, `[]`, `""`), become `{}`. Everything else is forwarded
/// as is.
pub fn parse_filter(filter: Option<&str>) -> Result<Value, QueryError> {
    let text = match filter.map(str::trim) {
        None | Some("") => return Ok(json!({})),
        Some(text) => text,
    };

    match serde_json::from_str::<Value>(text) {
        Ok(value) if has_keys(&value) => Ok(value),
        Ok(_) => Ok(json!({})),
        Err(e) => {
            log::debug!("Rejected filter JSON: {}", e);
            Err(QueryError::InvalidFilterJson)
        }
    }
}

fn has_keys(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Validates input and forwards it to Notion through a [`NotionRepository`].
#[derive(Clone)]
pub struct Relay {
    repository: Arc<dyn NotionRepository>,
}

impl Relay {
    pub fn new(repository: Arc<dyn NotionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, request: QueryRequest) -> QueryResult {
        let fetched_at = Utc::now();

        match self.run(&request).await {
            Ok(payload) => QueryResult::Success {
                payload,
                fetched_at,
            },
            Err(error) => {
                match &error {
                    QueryError::UpstreamError { status, code, .. } => {
                        log::warn!(
                            "Query for database '{}' failed upstream: HTTP {} [{}] {}",
                            request.database_id.trim(),
                            status,
                            code,
                            error
                        );
                        if code.is_credential_problem() {
                            log::info!(
                                "Notion rejected the token; the database may not be shared with the integration"
                            );
                        }
                    }
                    QueryError::TransportError { .. } => log::error!(
                        "Query for database '{}' failed: {}",
                        request.database_id.trim(),
                        error
                    ),
                    _ => log::info!("Rejected query input ({}): {}", error.kind(), error),
                }
                QueryResult::Failure { error, fetched_at }
            }
        }
    }

    async fn run(&self, request: &QueryRequest) -> Result<Value, QueryError> {
        let database_id =
            DatabaseId::parse(&request.database_id).map_err(|_| QueryError::MissingCredentials)?;
        let api_key = ApiKey::new(request.api_key.as_str())
            .map_err(|_| QueryError::MissingCredentials)?;
        let body = parse_filter(request.filter.as_deref())?;

        if !api_key.looks_like_integration_token() {
            log::debug!("API token {} does not look like an integration token", api_key);
        }
        if !database_id.looks_canonical() {
            log::debug!(
                "Database ID '{}' is not 32 hex digits; forwarding anyway",
                database_id
            );
        }

        log::info!("Querying Notion database {}", database_id);
        self.repository
            .query_database(&database_id, &api_key, &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotionErrorCode;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every call and answers with a canned outcome.
    struct RecordingRepository {
        calls: AtomicUsize,
        last_body: Mutex<Option<Value>>,
        outcome: Result<Value, QueryError>,
    }

    impl RecordingRepository {
        fn answering(outcome: Result<Value, QueryError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_body: Mutex::new(None),
                outcome,
            })
        }
    }

    #[async_trait::async_trait]
    impl NotionRepository for RecordingRepository {
        async fn query_database(
            &self,
            _database_id: &DatabaseId,
            _api_key: &ApiKey,
            body: &Value,
        ) -> Result<Value, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_body.lock().unwrap() = Some(body.clone());
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_make_no_call() {
        let repo = RecordingRepository::answering(Ok(json!({})));
        let relay = Relay::new(repo.clone());

        for (db, key) in [("", "secret"), ("db", ""), ("  ", "secret"), ("db", "\t")] {
            let result = relay.execute(QueryRequest::new(db, key, None)).await;
            assert_eq!(result.error(), Some(&QueryError::MissingCredentials));
            assert_eq!(
                result.message().as_deref(),
                Some("Database ID and API Key are required.")
            );
            assert_eq!(result.http_status(), 400);
        }
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_filter_makes_no_call() {
        let repo = RecordingRepository::answering(Ok(json!({})));
        let relay = Relay::new(repo.clone());

        let result = relay
            .execute(QueryRequest::new("db", "secret", Some("{not json".into())))
            .await;
        assert_eq!(result.error(), Some(&QueryError::InvalidFilterJson));
        assert_eq!(
            result.message().as_deref(),
            Some("Invalid JSON in query parameters.")
        );
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_filters_send_empty_object() {
        let repo = RecordingRepository::answering(Ok(json!({"results": []})));
        let relay = Relay::new(repo.clone());

        let filters = [
            None,
            Some(""),
            Some("   "),
            Some("{}"),
            Some("null"),
            Some("5"),
            Some("true"),
            Some("[]"),
            Some(r#""""#),
        ];
        for filter in filters {
            let result = relay
                .execute(QueryRequest::new("db", "secret", filter.map(str::to_string)))
                .await;
            assert!(result.is_success());
            assert_eq!(*repo.last_body.lock().unwrap(), Some(json!({})));
        }
        assert_eq!(repo.calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn test_filter_forwarded_verbatim() {
        let repo = RecordingRepository::answering(Ok(json!({"results": []})));
        let relay = Relay::new(repo.clone());
        let filter = r#"{"filter":{"property":"Done","checkbox":{"equals":true}}}"#;

        relay
            .execute(QueryRequest::new("db", "secret", Some(filter.into())))
            .await;
        assert_eq!(
            *repo.last_body.lock().unwrap(),
            Some(json!({"filter": {"property": "Done", "checkbox": {"equals": true}}}))
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_status() {
        let repo = RecordingRepository::answering(Err(QueryError::UpstreamError {
            status: 404,
            code: NotionErrorCode::ObjectNotFound,
            body: json!({"message": "Not found"}),
        }));
        let relay = Relay::new(repo);

        let result = relay.execute(QueryRequest::new("db", "secret", None)).await;
        assert_eq!(result.message().as_deref(), Some("Not found"));
        assert_eq!(result.details().unwrap()["status"], json!(404));
        assert_eq!(result.http_status(), 404);

        let body = result.to_json();
        assert_eq!(body["error"], json!("Not found"));
        assert_eq!(body["details"]["status"], json!(404));
        assert!(body[FETCHED_AT_KEY].is_string());
    }

    #[test]
    fn test_success_json_merges_fetch_time() {
        let fetched_at = DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = QueryResult::Success {
            payload: json!({"object": "list", "results": [], "has_more": false}),
            fetched_at,
        };
        assert_eq!(
            result.to_json(),
            json!({
                "object": "list",
                "results": [],
                "has_more": false,
                "dataFetchedAt": "2024-03-01T12:30:00.000Z"
            })
        );
    }

    #[test]
    fn test_transport_errors_map_to_500() {
        let error = QueryError::TransportError {
            message: "connection refused".into(),
        };
        assert_eq!(status_for_error(&error), 500);
    }
}
