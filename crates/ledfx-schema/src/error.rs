//! Validation error types.

use serde_json::Value;
use thiserror::Error;

/// Errors produced while normalizing a document against a [`Schema`](crate::Schema).
///
/// Field names are dotted paths relative to the document root
/// (e.g. `wled_preferences.inactivity_timeout.setting`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The document itself is not a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A field holds a value of the wrong JSON type.
    #[error("field '{field}': expected {expected}, found {found}")]
    WrongType {
        /// Path of the offending field.
        field: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
        /// JSON type that was found.
        found: &'static str,
    },

    /// A numeric field is outside its declared range.
    #[error("field '{field}': value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound (`-inf` when unbounded).
        min: f64,
        /// Inclusive upper bound (`inf` when unbounded).
        max: f64,
    },

    /// A string field is not one of its allowed choices.
    #[error("field '{field}': '{value}' is not one of [{}]", .allowed.join(", "))]
    InvalidChoice {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
        /// Allowed values.
        allowed: Vec<String>,
    },

    /// A field not declared by a closed schema.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    /// Prefix every field path in this error with `parent`.
    pub fn within(self, parent: &str) -> Self {
        let join = |field: String| format!("{parent}.{field}");
        match self {
            ValidationError::NotAnObject { found } => ValidationError::WrongType {
                field: parent.to_string(),
                expected: "object",
                found,
            },
            ValidationError::WrongType {
                field,
                expected,
                found,
            } => ValidationError::WrongType {
                field: join(field),
                expected,
                found,
            },
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => ValidationError::OutOfRange {
                field: join(field),
                value,
                min,
                max,
            },
            ValidationError::InvalidChoice {
                field,
                value,
                allowed,
            } => ValidationError::InvalidChoice {
                field: join(field),
                value,
                allowed,
            },
            ValidationError::UnknownField(field) => ValidationError::UnknownField(join(field)),
            ValidationError::Multiple(errors) => {
                ValidationError::Multiple(errors.into_iter().map(|e| e.within(parent)).collect())
            }
        }
    }

    /// Collapse a list of errors: none is `Ok`, one is returned as-is,
    /// several become [`ValidationError::Multiple`].
    pub fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }

    /// Number of individual field errors contained in this error.
    pub fn count(&self) -> usize {
        match self {
            ValidationError::Multiple(errors) => errors.iter().map(ValidationError::count).sum(),
            _ => 1,
        }
    }
}

/// Name of the JSON type of `value`, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
