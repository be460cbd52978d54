// src/web/mod.rs
//! HTTP surfaces: router, shared state, and page rendering.

pub mod form;
pub mod handlers;
pub mod pages;

use crate::api::Relay;
use crate::config::ServerConfig;
use crate::error::AppError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use pages::PageRenderer;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

/// Shared application state. Everything in it is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub relay: Relay,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: ServerConfig, relay: Relay) -> Result<Self, AppError> {
        Ok(Self {
            config: Arc::new(config),
            relay,
            pages: Arc::new(PageRenderer::new()?),
        })
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route(
            "/api/notion_database/{database_id}",
            get(handlers::passthrough),
        )
        .route("/table-view/ndb/{database_id}", get(handlers::table_view))
        .route("/view/ndb/{database_id}", get(handlers::raw_view))
        .route("/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        )))
        .with_state(state)
}

/// Process-level failures inside a handler become a plain-text 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error while rendering the page.",
        )
            .into_response()
    }
}
