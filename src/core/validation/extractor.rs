//! Axum extractor for validated payloads
//!
//! This module provides the `Validated<T>` extractor that validates and
//! filters a JSON body and deserializes it into `T` before the handler runs.

use super::config::EntityValidationConfig;
use crate::core::error::{RequestError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Trait for payload types that carry a validation configuration
pub trait ValidatableEntity: DeserializeOwned + Sized {
    /// Rules applied to the raw payload
    fn validation_config() -> EntityValidationConfig;

    /// Run the rules, then deserialize the filtered payload
    fn validate(payload: Value) -> Result<Self, ValidationError> {
        let filtered = Self::validation_config()
            .validate_and_filter(payload)
            .map_err(ValidationError::FieldErrors)?;

        serde_json::from_value(filtered).map_err(|e| ValidationError::InvalidJson {
            message: e.to_string(),
        })
    }
}

/// Axum extractor that validates and filters a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_request(
///     Validated(draft): Validated<NewRequest>,
/// ) -> Response {
///     // draft is already normalized and typed
/// }
/// ```
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + Send,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            RequestError::Validation(ValidationError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        T::validate(payload).map(Validated).map_err(RequestError::Validation)
    }
}
