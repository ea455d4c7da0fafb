//! Declarative per-field validation configuration

use crate::core::error::FieldValidationError;
use anyhow::Result;
use serde_json::{Map, Value};

type FieldFilter = Box<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;
type FieldValidator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Filters and validators attached to a single field
///
/// Filters run first, in declaration order, and may rewrite the value.
/// Validators then run in order; the first failure is the field's message.
#[derive(Default)]
pub struct FieldRules {
    filters: Vec<FieldFilter>,
    validators: Vec<FieldValidator>,
}

impl FieldRules {
    /// Append a value transform
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Append a validator
    pub fn validate<V>(mut self, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    fn apply(&self, field: &str, value: Value) -> Result<Value, String> {
        let mut value = value;
        for filter in &self.filters {
            value = filter(field, value).map_err(|e| format!("{} {}", field, e))?;
        }
        for validator in &self.validators {
            validator(field, &value)?;
        }
        Ok(value)
    }
}

/// Validation configuration for one entity payload
///
/// Only declared fields survive `validate_and_filter`; anything else in the
/// payload is dropped.
#[derive(Default)]
pub struct EntityValidationConfig {
    fields: Vec<(String, FieldRules)>,
}

impl EntityValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field and build its rules
    pub fn field(
        mut self,
        name: impl Into<String>,
        build: impl FnOnce(FieldRules) -> FieldRules,
    ) -> Self {
        self.fields.push((name.into(), build(FieldRules::default())));
        self
    }

    /// Filter and validate a payload
    ///
    /// Returns the filtered payload, or every field error found.
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut input) = payload else {
            return Err(vec![FieldValidationError {
                field: "body".to_string(),
                message: "request body must be a JSON object".to_string(),
            }]);
        };

        let mut output = Map::new();
        let mut errors = Vec::new();

        for (name, rules) in &self.fields {
            let raw = input.remove(name).unwrap_or(Value::Null);
            match rules.apply(name, raw) {
                Ok(Value::Null) => {}
                Ok(value) => {
                    output.insert(name.clone(), value);
                }
                Err(message) => errors.push(FieldValidationError {
                    field: name.clone(),
                    message,
                }),
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(errors)
        }
    }
}
