//! Core module containing the request domain, its rules and the storage seam

pub mod envelope;
pub mod error;
pub mod query;
pub mod request;
pub mod store;
pub mod transition;
pub mod validation;

pub use envelope::{Envelope, ResponseAssembler};
pub use error::{FieldValidationError, RequestError, RequestResult, ValidationError};
pub use query::{
    CompiledQuery, PageMeta, QueryPage, RequestFilter, RequestQuery, SortField, SortOrder,
    SortSpec,
};
pub use request::{NewRequest, Request, RequestStatus};
pub use store::{RequestStore, StatusWrite};
pub use transition::StatusPolicy;
pub use validation::{EntityValidationConfig, FieldRules, ValidatableEntity, Validated};
