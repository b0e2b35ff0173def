//! Declarative field schemas interpreted by the validation pipeline
//!
//! A [`Schema`] maps field names to a list of [`Rule`]s. Running it over a
//! raw JSON body yields either a normalized object that holds only the
//! declared fields, or every field-level violation found.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::validators;
use crate::core::error::{FieldError, ValidationError};

/// A single constraint attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Field must be present and a string
    RequiredString,
    /// Field may be absent; when present it must be a string
    OptionalString,
    /// String must be a syntactically valid email address
    EmailFormat,
    /// String must have at least this many characters
    MinLength(usize),
}

impl Rule {
    /// Check one value against this rule. `Value::Null` means "absent".
    pub fn check(&self, field: &str, value: &Value) -> Result<(), FieldError> {
        let outcome = match self {
            Rule::RequiredString => validators::required_string()(field, value),
            Rule::OptionalString => validators::optional_string()(field, value),
            Rule::EmailFormat => validators::email_format()(field, value),
            Rule::MinLength(n) => validators::min_length(*n)(field, value),
        };
        outcome.map_err(|message| FieldError::new(field, self.constraint(value), message))
    }

    /// Constraint name reported for a failure on `value`
    fn constraint(&self, value: &Value) -> &'static str {
        match self {
            Rule::RequiredString if value.is_null() => "required",
            Rule::RequiredString | Rule::OptionalString => "string",
            Rule::EmailFormat => "email",
            Rule::MinLength(_) => "min_length",
        }
    }
}

/// Ordered field → rules mapping
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field and its rules
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    /// Run every rule of every field and collect all violations
    ///
    /// A non-object input is treated as an object with no fields. JSON
    /// `null` counts as absent. Undeclared fields never reach the output.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, Vec<FieldError>> {
        let empty = Map::new();
        let object = input.as_object().unwrap_or(&empty);

        let mut normalized = Map::new();
        let mut errors = Vec::new();

        for (name, rules) in &self.fields {
            let value = object.get(*name).unwrap_or(&Value::Null);
            let before = errors.len();
            for rule in rules {
                if let Err(e) = rule.check(name, value) {
                    errors.push(e);
                }
            }
            if errors.len() == before && !value.is_null() {
                normalized.insert((*name).to_string(), value.clone());
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }

    /// Validate, then build the typed input struct from the normalized object
    pub fn validate_into<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationError> {
        let normalized = self.validate(input).map_err(ValidationError::FieldErrors)?;
        serde_json::from_value(Value::Object(normalized)).map_err(|e| {
            ValidationError::InvalidJson {
                message: e.to_string(),
            }
        })
    }
}
