// src/web/handlers.rs
//! Request handlers for every route.
//!
//! Each handler performs at most one relay call and renders its outcome.

use super::form::{compose_failure_message, QueryForm, ViewLinks};
use super::pages::{FormOutcome, IndexPage, RawViewPage, TableViewPage};
use super::AppState;
use crate::api::{QueryRequest, QueryResult};
use crate::constants::{LEGACY_TOKEN_PARAM, TOKEN_PARAM};
use crate::error::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Query string shared by the three view surfaces.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    pub api_key: Option<String>,
    pub sak: Option<String>,
    pub filter: Option<String>,
}

impl ViewQuery {
    /// Picks the token to use. `api_key` wins over the legacy `sak` alias,
    /// which is ignored entirely when `accept_legacy` is false.
    pub fn resolve_token(&self, accept_legacy: bool) -> Option<String> {
        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        if let Some(token) = non_blank(&self.api_key) {
            return Some(token);
        }
        if !accept_legacy {
            if self.sak.is_some() {
                log::info!(
                    "Ignoring '{}' query parameter; only '{}' is accepted",
                    LEGACY_TOKEN_PARAM,
                    TOKEN_PARAM
                );
            }
            return None;
        }

        let token = non_blank(&self.sak)?;
        log::warn!(
            "Deprecated query parameter '{}' used; switch to '{}'",
            LEGACY_TOKEN_PARAM,
            TOKEN_PARAM
        );
        Some(token)
    }

    fn non_blank_filter(&self) -> Option<String> {
        self.filter.clone().filter(|f| !f.trim().is_empty())
    }
}

fn missing_token_message() -> String {
    format!("API Key ({}) is missing in query parameters.", TOKEN_PARAM)
}

fn status_of(result: &QueryResult) -> StatusCode {
    StatusCode::from_u16(result.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// --- Passthrough JSON ---

pub async fn passthrough(
    State(state): State<AppState>,
    Path(database_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Response {
    log::debug!("GET /api/notion_database/{}", database_id);

    let Some(api_key) = query.resolve_token(state.config.accept_legacy_token_param) else {
        log::info!("Passthrough request for '{}' without a token", database_id);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": missing_token_message() })),
        )
            .into_response();
    };

    let result = state
        .relay
        .execute(QueryRequest::new(
            database_id,
            api_key,
            query.non_blank_filter(),
        ))
        .await;

    (status_of(&result), Json(result.to_json())).into_response()
}

// --- Table view ---

pub async fn table_view(
    State(state): State<AppState>,
    Path(database_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, AppError> {
    log::debug!("GET /table-view/ndb/{}", database_id);
    let filter = query.non_blank_filter();

    let Some(api_key) = query.resolve_token(state.config.accept_legacy_token_param) else {
        let page = TableViewPage::rejected(&database_id, filter, &missing_token_message());
        let html = state.pages.table_view(&page)?;
        return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
    };

    let result = state
        .relay
        .execute(QueryRequest::new(
            database_id.as_str(),
            api_key,
            filter.clone(),
        ))
        .await;

    let page = TableViewPage::from_result(&database_id, filter, &result);
    let html = state.pages.table_view(&page)?;
    Ok((status_of(&result), Html(html)).into_response())
}

// --- Raw JSON view ---

pub async fn raw_view(
    State(state): State<AppState>,
    Path(database_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, AppError> {
    log::debug!("GET /view/ndb/{}", database_id);

    let Some(api_key) = query.resolve_token(state.config.accept_legacy_token_param) else {
        let page = RawViewPage::rejected(&database_id, &missing_token_message());
        let html = state.pages.raw_view(&page)?;
        return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
    };

    let result = state
        .relay
        .execute(QueryRequest::new(
            database_id.as_str(),
            api_key,
            query.non_blank_filter(),
        ))
        .await;

    let page = RawViewPage::from_result(&database_id, &result);
    let html = state.pages.raw_view(&page)?;
    Ok((status_of(&result), Html(html)).into_response())
}

// --- Query form ---

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    log::debug!("GET /");
    Ok(Html(state.pages.index(&IndexPage::blank())?))
}

pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Result<Response, AppError> {
    log::debug!("POST /");

    let mut page = IndexPage::blank();
    page.database_id = form.database_id.clone();
    page.filter = form.filter.clone();

    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            log::info!("Query form rejected with field errors");
            page.errors = errors;
            let html = state.pages.index(&page)?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    let database_id = request.database_id.clone();
    let api_key = request.api_key.clone();
    let result = state.relay.execute(request).await;

    page.outcome = Some(match result.message() {
        None => FormOutcome {
            success: true,
            title: "Validation Successful!".to_string(),
            message: "Your inputs are valid and the database was queried successfully. Use the links below to view the data.".to_string(),
            links: Some(ViewLinks::build(
                state.config.public_base_url.as_ref(),
                &database_id,
                &api_key,
                form.non_blank_filter(),
            )),
        },
        Some(message) => FormOutcome {
            success: false,
            title: "Validation Error".to_string(),
            message: compose_failure_message(&message, result.details().as_ref()),
            links: None,
        },
    });

    let html = state.pages.index(&page)?;
    Ok(Html(html).into_response())
}

// --- Health ---

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
