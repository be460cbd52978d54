// src/error.rs
//! Application error types with structured error handling.
//!
//! Two vocabularies live here. [`QueryError`] describes why a single relay
//! attempt failed; it is always recovered at the relay boundary and shown
//! to the user. [`AppError`] describes process-level failures (startup,
//! configuration, templates) that abort an operation.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is not shared with the integration
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body carries no code
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether the token itself was rejected, as opposed to the query.
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::RestrictedResource)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Why a single relay attempt failed.
///
/// The `Display` text is the user-facing message shown in alert panels and
/// in the `error` field of the passthrough JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Database ID and API Key are required.")]
    MissingCredentials,

    #[error("Invalid JSON in query parameters.")]
    InvalidFilterJson,

    #[error("{}", upstream_message(.status, .body))]
    UpstreamError {
        status: u16,
        code: NotionErrorCode,
        body: serde_json::Value,
    },

    #[error("Network or server error: {message}")]
    TransportError { message: String },
}

fn upstream_message(status: &u16, body: &serde_json::Value) -> String {
    body.get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("API Error: {}", status))
}

impl QueryError {
    /// Opaque payload shown alongside the message, if any.
    ///
    /// For upstream failures this is the Notion error body with `status`
    /// guaranteed present.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            QueryError::UpstreamError { status, body, .. } => match body {
                serde_json::Value::Object(map) => {
                    let mut map = map.clone();
                    map.entry("status")
                        .or_insert_with(|| serde_json::Value::from(*status));
                    Some(serde_json::Value::Object(map))
                }
                other => Some(serde_json::json!({
                    "status": status,
                    "body": other,
                })),
            },
            _ => None,
        }
    }

    /// Upstream HTTP status, when the failure came from Notion itself.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            QueryError::UpstreamError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-friendly name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::MissingCredentials => "missing_credentials",
            QueryError::InvalidFilterJson => "invalid_filter_json",
            QueryError::UpstreamError { .. } => "upstream_error",
            QueryError::TransportError { .. } => "transport_error",
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        QueryError::TransportError {
            message: err.to_string(),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template registration failed for {name}: {message}")]
    TemplateRegistration { name: String, message: String },

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}
