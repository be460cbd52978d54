//! notion-query-tool library: a small web front-end and relay for querying
//! Notion databases.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `QueryError`, `ValidationError`
//! - **Configuration** — `CommandLineInput`, `ServerConfig`
//! - **Domain model** — `PropertyValue`, `NotionPage`, `QueryResponse`
//! - **API client** — `NotionHttpClient`, `NotionRepository`, `Relay`
//! - **Formatting** — `render_property`, `TableBuilder`
//! - **Web** — `AppState`, `build_router`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod model;
pub mod types;
pub mod web;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, QueryError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ServerConfig};

// --- Domain Model ---
pub use crate::model::{NotionPage, PropertyValue, QueryResponse};

// --- Domain Types ---
pub use crate::types::{ApiKey, Color, DatabaseId, PageId, ValidatedUrl};

// --- API Client ---
pub use crate::api::{NotionHttpClient, NotionRepository, QueryRequest, QueryResult, Relay};

// --- Formatting ---
pub use crate::formatting::{render_property, render_property_html, TableBuilder};

// --- Web ---
pub use crate::web::{build_router, AppState};
