//! Reusable field validators
//!
//! Each validator receives the field name and the raw JSON value. Absent
//! fields are passed as `Value::Null`; only [`required_string`] rejects them.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok())
        .as_ref()
}

/// Whether `value` looks like an email address
pub fn is_email(value: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(value))
}

/// Validator: field must be present and a string (the empty string is allowed)
pub fn required_string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(_) => Ok(()),
        _ => Err(format!("'{}' must be a string", field)),
    }
}

/// Validator: field may be absent, but must be a string when present
pub fn optional_string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::String(_) => Ok(()),
        _ => Err(format!("'{}' must be a string", field)),
    }
}

/// Validator: string must be a valid email address
pub fn email_format() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::String(s) if !is_email(s) => {
            Err(format!("'{}' must be a valid email address", field))
        }
        // Non-strings are reported by the type validators
        _ => Ok(()),
    }
}

/// Validator: string must have at least `min` characters
pub fn min_length(min: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                return Err(format!(
                    "'{}' must be at least {} characters (got {})",
                    field, min, len
                ));
            }
        }
        Ok(())
    }
}
