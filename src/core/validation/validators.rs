//! Reusable field validators
//!
//! Each validator returns a message that starts with the field name, so the
//! list of messages can be shown to a client as-is.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Digits, an optional leading `+`, spaces, hyphens and parentheses
const PHONE_PATTERN: &str = r"^\+?[0-9\s\-()]+$";

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

/// Validator: field is present, not null and not a blank string
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        let missing = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if missing {
            Err(format!("{} is required", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: value is a string (null passes; pair with `required`)
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::String(_) => Ok(()),
        _ => Err(format!("{} must be a string", field)),
    }
}

/// Validator: value is a JSON number (null passes; pair with `required`)
pub fn number() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::Number(_) => Ok(()),
        _ => Err(format!("{} must be a number", field)),
    }
}

/// Validator: number must not be below minimum
pub fn min_value(min: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num < min {
                if min == 0.0 {
                    Err(format!("{} must not be negative", field))
                } else {
                    Err(format!("{} must be at least {} (value: {})", field, min, num))
                }
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string looks like a phone number
pub fn phone() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if phone_regex().is_match(s) {
                Ok(())
            } else {
                Err(format!("{} must be a valid phone number", field))
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be one of the allowed strings
///
/// Null passes. Any other non-string value is rejected rather than coerced.
pub fn one_of(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if allowed.iter().any(|a| a == s) => Ok(()),
        _ => Err(format!("{} must be one of: {}", field, allowed.join(", "))),
    }
}
