// src/api/mod.rs
//! Notion API interaction: the ability to query one database.
//!
//! I/O lives in [`client`], response classification in [`parser`], and
//! input validation plus outcome normalization in [`relay`].

pub mod client;
pub mod parser;
pub mod relay;

use crate::error::QueryError;
use crate::types::{ApiKey, DatabaseId};
use serde_json::Value;

/// The ability to run a database query against Notion.
///
/// Surfaces depend on this trait, never on HTTP details, so tests can
/// substitute the transport.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Issues exactly one query with `body` and returns the parsed payload.
    async fn query_database(
        &self,
        database_id: &DatabaseId,
        api_key: &ApiKey,
        body: &Value,
    ) -> Result<Value, QueryError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use relay::{parse_filter, QueryRequest, QueryResult, Relay};
