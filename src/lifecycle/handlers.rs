//! HTTP handlers for request operations
//!
//! Handlers only extract and delegate: business rules live in
//! [`RequestService`] and every outcome goes through the
//! [`ResponseAssembler`].

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::envelope::ResponseAssembler;
use crate::core::error::{RequestError, RequestResult, ValidationError};
use crate::core::query::RequestQuery;
use crate::core::request::NewRequest;
use crate::core::validation::Validated;
use crate::lifecycle::service::RequestService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RequestService>,
    pub assembler: ResponseAssembler,
}

impl AppState {
    pub fn new(service: RequestService, assembler: ResponseAssembler) -> Self {
        Self {
            service: Arc::new(service),
            assembler,
        }
    }
}

/// POST /api/requests
pub async fn create_request(
    State(state): State<AppState>,
    Validated(draft): Validated<NewRequest>,
) -> Response {
    match state.service.create(draft).await {
        Ok(created) => state.assembler.created(created),
        Err(e) => state.assembler.failure(e),
    }
}

/// DELETE /api/requests/{id}
pub async fn delete_request(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let result = async {
        let id = RequestError::parse_id(&key)?;
        state.service.delete(&id).await
    }
    .await;

    match result {
        Ok(deleted) => state.assembler.deleted(deleted),
        Err(e) => state.assembler.failure(e),
    }
}

/// PATCH /api/requests/{id}
///
/// Body: `{"status": "<status>"}`. An empty body counts as a missing status.
pub async fn update_request_status(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Response {
    let result = async {
        let id = RequestError::parse_id(&key)?;
        let status = status_from_body(&body)?;
        state.service.update_status(&id, status.as_deref()).await
    }
    .await;

    match result {
        Ok(updated) => state.assembler.updated(updated),
        Err(e) => state.assembler.failure(e),
    }
}

/// GET /api/requests/{userID}
pub async fn list_requests(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<RequestQuery>, QueryRejection>,
) -> Response {
    let result = async {
        let Query(query) = query.map_err(|e| ValidationError::FieldError {
            field: "query".to_string(),
            message: e.body_text(),
        })?;
        state.service.list(&user_id, &query).await
    }
    .await;

    match result {
        Ok(page) => state.assembler.page(page),
        Err(e) => state.assembler.failure(e),
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Pull the `status` member out of a PATCH body
///
/// Non-string values are passed on as their JSON text so the status parser
/// reports them.
fn status_from_body(body: &[u8]) -> RequestResult<Option<String>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let payload: Value =
        serde_json::from_slice(body).map_err(|e| ValidationError::InvalidJson {
            message: e.to_string(),
        })?;

    let status = match payload.get("status") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(status)
}
