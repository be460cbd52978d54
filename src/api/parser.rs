// src/api/parser.rs
//! Classifies raw query responses into a payload or a [`QueryError`].

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{NotionErrorCode, QueryError};
use reqwest::StatusCode;
use serde_json::Value;

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
}

/// Turns a response into the JSON payload on 2xx, or the matching error.
pub fn classify_query_response(result: ApiResponse<String>) -> Result<Value, QueryError> {
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status, &result.url))
    }
}

fn parse_success(body: &str, url: &str) -> Result<Value, QueryError> {
    serde_json::from_str(body).map_err(|e| {
        log::error!(
            "Failed to parse response from {}: {} (body: {})",
            url,
            e,
            preview(body)
        );
        QueryError::TransportError {
            message: format!("Response was not valid JSON: {}", e),
        }
    })
}

fn parse_error(body: &str, status: StatusCode, url: &str) -> QueryError {
    let parsed = serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.into()));

    let code = parsed
        .get("code")
        .and_then(Value::as_str)
        .map(NotionErrorCode::from_api_response)
        .unwrap_or_else(|| NotionErrorCode::from_http_status(status.as_u16()));

    log::warn!(
        "Notion API error from {}: HTTP {} [{}] {}",
        url,
        status.as_u16(),
        code,
        preview(body)
    );

    QueryError::UpstreamError {
        status: status.as_u16(),
        code,
        body: parsed,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(status: u16, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            url: "https://api.notion.com/v1/databases/x/query".to_string(),
        }
    }

    #[test]
    fn test_success_body_is_returned_unchanged() {
        let payload = classify_query_response(response(200, r#"{"results":[],"has_more":false}"#))
            .unwrap();
        assert_eq!(payload, json!({"results": [], "has_more": false}));
    }

    #[test]
    fn test_non_json_success_is_transport_error() {
        let err = classify_query_response(response(200, "<html>")).unwrap_err();
        assert!(matches!(err, QueryError::TransportError { .. }));
    }

    #[test]
    fn test_error_body_with_code() {
        let err = classify_query_response(response(
            404,
            r#"{"object":"error","status":404,"code":"object_not_found","message":"Not found"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Not found");
        assert_eq!(err.upstream_status(), Some(404));
        match err {
            QueryError::UpstreamError { code, .. } => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_body_without_json() {
        let err = classify_query_response(response(502, "Bad Gateway")).unwrap_err();
        assert_eq!(err.to_string(), "API Error: 502");
        assert_eq!(
            err,
            QueryError::UpstreamError {
                status: 502,
                code: NotionErrorCode::HttpStatus(502),
                body: json!("Bad Gateway"),
            }
        );
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(ERROR_BODY_PREVIEW_LENGTH + 10);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), ERROR_BODY_PREVIEW_LENGTH + 3);
    }
}
