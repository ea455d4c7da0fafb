//! Validation and filtering system
//!
//! Payloads are validated declaratively before they are turned into typed
//! records: each field runs through its filters (value transforms) and then
//! its validators, and every invalid field contributes one message.

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::{EntityValidationConfig, FieldRules};
pub use extractor::{ValidatableEntity, Validated};
