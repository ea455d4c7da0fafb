//! Typed error handling for the request lifecycle
//!
//! Every failure an operation can produce is a [`RequestError`]. Handlers
//! never build error bodies themselves: the response assembler
//! ([`crate::core::envelope::ResponseAssembler`]) turns a `RequestError`
//! into the uniform envelope with the matching HTTP status.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: payload or query parameter rejected (400)
//! - `InvalidIdentifier`: malformed request id (400)
//! - `NotFound` / `NoMatches`: nothing matched the id or the filter (404)
//! - `InvalidStatus` / `NotModifiable`: status change refused (400)
//! - `Conflict`: the record changed between read and write (409)
//! - `Storage`: persistence failure (500)

use crate::core::request::RequestStatus;
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

/// The main error type for request operations
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Payload or query validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The path segment is not a valid request id
    #[error("Invalid request ID: '{value}'")]
    InvalidIdentifier { value: String },

    /// No record with this id
    #[error("Request not found")]
    NotFound { id: Uuid },

    /// The query matched no records on the requested page
    #[error("No requests found")]
    NoMatches,

    /// Status value outside the enumeration
    #[error("Invalid status '{value}'. Allowed: {}", RequestStatus::allowed_list())]
    InvalidStatus { value: String },

    /// The transition gate refused to modify the record in its current status
    #[error("Request with status '{status}' cannot be modified")]
    NotModifiable { status: RequestStatus },

    /// The status changed between the read and the conditional write
    #[error(
        "Request status changed concurrently (expected '{expected}', found '{current}'); reload and retry"
    )]
    Conflict {
        id: Uuid,
        expected: RequestStatus,
        current: RequestStatus,
    },

    /// Persistence collaborator failure
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RequestError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Validation(_) => StatusCode::BAD_REQUEST,
            RequestError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            RequestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RequestError::NoMatches => StatusCode::NOT_FOUND,
            RequestError::InvalidStatus { .. } => StatusCode::BAD_REQUEST,
            RequestError::NotModifiable { .. } => StatusCode::BAD_REQUEST,
            RequestError::Conflict { .. } => StatusCode::CONFLICT,
            RequestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Validation(_) => "VALIDATION_ERROR",
            RequestError::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            RequestError::NotFound { .. } => "REQUEST_NOT_FOUND",
            RequestError::NoMatches => "NO_MATCHES",
            RequestError::InvalidStatus { .. } => "INVALID_STATUS",
            RequestError::NotModifiable { .. } => "NOT_MODIFIABLE",
            RequestError::Conflict { .. } => "STATUS_CONFLICT",
            RequestError::Storage(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure is on the server side
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Parse a path segment into a request id
    pub fn parse_id(raw: &str) -> Result<Uuid, RequestError> {
        Uuid::parse_str(raw).map_err(|_| RequestError::InvalidIdentifier {
            value: raw.to_string(),
        })
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("{message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error(
        "Validation errors: {}",
        .0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
    )]
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Missing required argument
    #[error("{argument} is not specified")]
    MissingArgument { argument: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Human-readable messages, one per invalid field
    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.message.clone()).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

/// A specialized Result type for request operations
pub type RequestResult<T> = Result<T, RequestError>;
