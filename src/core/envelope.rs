//! Uniform response envelope and the assembler that builds it
//!
//! Every endpoint answers with
//! `{success, message, data?, pagination?, errors?, error?}`.

use crate::core::error::{RequestError, ValidationError};
use crate::core::query::{PageMeta, QueryPage};
use crate::core::request::Request;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// The uniform response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Diagnostic detail for internal failures (non-production only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: None,
            errors: None,
            error: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            pagination: None,
            errors: None,
            error: None,
        }
    }
}

/// Maps operation outcomes to HTTP responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAssembler {
    expose_internal_errors: bool,
}

impl ResponseAssembler {
    /// `expose_internal_errors` controls whether 500 responses carry the
    /// underlying error message
    pub fn new(expose_internal_errors: bool) -> Self {
        Self {
            expose_internal_errors,
        }
    }

    /// 201 with the created record
    pub fn created(&self, request: Request) -> Response {
        (
            StatusCode::CREATED,
            Json(Envelope::success("Request created successfully", request)),
        )
            .into_response()
    }

    /// 200 with the deleted record
    pub fn deleted(&self, request: Request) -> Response {
        (
            StatusCode::OK,
            Json(Envelope::success("Request deleted successfully", request)),
        )
            .into_response()
    }

    /// 200 with the updated record
    pub fn updated(&self, request: Request) -> Response {
        (
            StatusCode::OK,
            Json(Envelope::success("Request status updated successfully", request)),
        )
            .into_response()
    }

    /// 200 with a page of records, or 404 with `data: []` when the page is empty
    pub fn page(&self, page: QueryPage) -> Response {
        let (status, envelope) = self.page_envelope(page);
        (status, Json(envelope)).into_response()
    }

    pub fn page_envelope(&self, page: QueryPage) -> (StatusCode, Envelope<Vec<Request>>) {
        let QueryPage {
            records,
            pagination,
        } = page;

        if records.is_empty() {
            let mut envelope = Envelope::failure(RequestError::NoMatches.to_string());
            envelope.data = Some(Vec::new());
            envelope.pagination = Some(pagination);
            return (StatusCode::NOT_FOUND, envelope);
        }

        let mut envelope = Envelope::success("Requests found", records);
        envelope.pagination = Some(pagination);
        (StatusCode::OK, envelope)
    }

    /// Error response for any failed operation
    pub fn failure(&self, err: RequestError) -> Response {
        let (status, envelope) = self.failure_envelope(&err);
        (status, Json(envelope)).into_response()
    }

    pub fn failure_envelope(&self, err: &RequestError) -> (StatusCode, Envelope<()>) {
        let status = err.status_code();

        if err.is_internal() {
            tracing::error!(code = err.error_code(), error = %err, "request operation failed");
        } else {
            tracing::debug!(code = err.error_code(), error = %err, "request operation rejected");
        }

        let envelope = match err {
            RequestError::Validation(v @ ValidationError::FieldErrors(_)) => {
                let mut envelope = Envelope::failure("Validation failed");
                envelope.errors = Some(v.messages());
                envelope
            }
            RequestError::Validation(v) => {
                let mut envelope = Envelope::failure(v.to_string());
                envelope.errors = Some(v.messages());
                envelope
            }
            RequestError::InvalidIdentifier { .. } => Envelope::failure("Invalid request ID"),
            RequestError::Storage(source) => {
                let mut envelope = Envelope::failure("Internal server error");
                if self.expose_internal_errors {
                    envelope.error = Some(format!("{:#}", source));
                }
                envelope
            }
            other => Envelope::failure(other.to_string()),
        };

        (status, envelope)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        ResponseAssembler::default().failure(self)
    }
}
