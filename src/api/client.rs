// src/api/client.rs
//! Thin HTTP client for the Notion query endpoint.
//!
//! One pooled `reqwest::Client` is shared by every request; the token is
//! attached per call because each user brings their own.

use super::parser::{classify_query_response, ApiResponse};
use super::NotionRepository;
use crate::constants::NOTION_VERSION;
use crate::error::{AppError, QueryError};
use crate::types::{ApiKey, DatabaseId, ValidatedUrl};
use reqwest::{header, Client, Response};
use serde_json::Value;
use url::Url;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: ValidatedUrl,
}

impl NotionHttpClient {
    /// Creates a client talking to the given API root (normally
    /// `https://api.notion.com/v1`).
    pub fn new(base_url: ValidatedUrl) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &ValidatedUrl {
        &self.base_url
    }

    /// Creates the headers for one Notion API request.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, QueryError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                QueryError::TransportError {
                    message: format!("Invalid API token format: {}", e),
                }
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        );

        Ok(headers)
    }

    /// `{base}/databases/{id}/query` with the ID percent-encoded as one segment.
    pub fn query_url(&self, database_id: &DatabaseId) -> Result<Url, QueryError> {
        let mut url = self.base_url.as_url().clone();
        url.path_segments_mut()
            .map_err(|_| QueryError::TransportError {
                message: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(["databases", database_id.as_str(), "query"]);
        Ok(url)
    }

    /// Makes a POST request with JSON body to the given URL.
    pub async fn post(
        &self,
        url: Url,
        api_key: &ApiKey,
        body: &Value,
    ) -> Result<Response, QueryError> {
        log::info!("🔍 HTTP POST DATABASE QUERY: {}", url);
        log::debug!(
            "   Query body: {}",
            serde_json::to_string(body).unwrap_or_else(|_| "Failed to serialize".to_string())
        );

        let response = self
            .client
            .post(url)
            .headers(Self::create_headers(api_key)?)
            .json(body)
            .send()
            .await?;

        log::info!("📊 DATABASE QUERY RESPONSE: status {}", response.status());

        Ok(response)
    }
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn query_database(
        &self,
        database_id: &DatabaseId,
        api_key: &ApiKey,
        body: &Value,
    ) -> Result<Value, QueryError> {
        let url = self.query_url(database_id)?;
        let response = self.post(url, api_key, body).await?;
        let result = extract_response_text(response).await?;
        classify_query_response(result)
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, QueryError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> NotionHttpClient {
        NotionHttpClient::new(ValidatedUrl::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_query_url_keeps_base_path() {
        let id = DatabaseId::parse("abc123").unwrap();
        let url = client("https://api.notion.com/v1").query_url(&id).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.notion.com/v1/databases/abc123/query"
        );

        let url = client("http://127.0.0.1:8080/").query_url(&id).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/databases/abc123/query");
    }

    #[test]
    fn test_query_url_encodes_id_as_one_segment() {
        let id = DatabaseId::parse("a/b c").unwrap();
        let url = client("https://api.notion.com/v1").query_url(&id).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.notion.com/v1/databases/a%2Fb%20c/query"
        );
    }

    #[test]
    fn test_headers_reject_unencodable_tokens() {
        let key = ApiKey::new("secret_line\nbreak").unwrap();
        let err = NotionHttpClient::create_headers(&key).unwrap_err();
        assert!(matches!(err, QueryError::TransportError { .. }));

        let key = ApiKey::new("secret_ok").unwrap();
        let headers = NotionHttpClient::create_headers(&key).unwrap();
        assert_eq!(headers["authorization"], "Bearer secret_ok");
        assert_eq!(headers["notion-version"], NOTION_VERSION);
        assert_eq!(headers["cache-control"], "no-store");
    }
}
