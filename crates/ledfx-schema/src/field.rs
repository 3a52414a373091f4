//! Field declarations and per-value validation.

use serde_json::{Number, Value};

use crate::error::{ValidationError, ValidationResult, json_type_name};
use crate::schema::Schema;

/// The type and constraints a field's value must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any JSON value is accepted unchanged.
    Any,
    /// A JSON boolean.
    Bool,
    /// A JSON integer, optionally bounded (inclusive).
    Int {
        /// Inclusive lower bound.
        min: Option<i64>,
        /// Inclusive upper bound.
        max: Option<i64>,
    },
    /// A JSON number, optionally bounded (inclusive). Integers are coerced to floats.
    Float {
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// A JSON string.
    Str,
    /// A JSON string restricted to a fixed set of values.
    Choice(Vec<String>),
    /// A JSON array with unconstrained elements.
    List,
    /// A JSON object with unconstrained entries.
    Map,
    /// A JSON object normalized against a sub-schema.
    Nested(Schema),
}

impl FieldKind {
    /// Unbounded integer.
    pub const fn int() -> Self {
        FieldKind::Int {
            min: None,
            max: None,
        }
    }

    /// Integer within `[min, max]`.
    pub const fn int_range(min: i64, max: i64) -> Self {
        FieldKind::Int {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Unbounded float.
    pub const fn float() -> Self {
        FieldKind::Float {
            min: None,
            max: None,
        }
    }

    /// Float within `[min, max]`.
    pub const fn float_range(min: f64, max: f64) -> Self {
        FieldKind::Float {
            min: Some(min),
            max: Some(max),
        }
    }

    /// String restricted to `choices`.
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Choice(choices.into_iter().map(Into::into).collect())
    }

    /// Infer an unconstrained kind from an example value.
    ///
    /// Used for setting entries, whose `setting` must keep the type of its default.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Null => FieldKind::Any,
            Value::Bool(_) => FieldKind::Bool,
            Value::Number(n) if n.is_f64() => FieldKind::float(),
            Value::Number(_) => FieldKind::int(),
            Value::String(_) => FieldKind::Str,
            Value::Array(_) => FieldKind::List,
            Value::Object(_) => FieldKind::Map,
        }
    }

    /// Short description of the expected type.
    pub const fn describe(&self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::Bool => "bool",
            FieldKind::Int { .. } => "int",
            FieldKind::Float { .. } => "float",
            FieldKind::Str => "string",
            FieldKind::Choice(_) => "choice",
            FieldKind::List => "list",
            FieldKind::Map | FieldKind::Nested(_) => "object",
        }
    }

    /// Validate `value` for the field named `field`, returning the normalized value.
    pub fn validate(&self, field: &str, value: &Value) -> ValidationResult<Value> {
        let wrong_type = || ValidationError::WrongType {
            field: field.to_string(),
            expected: self.describe(),
            found: json_type_name(value),
        };

        match self {
            FieldKind::Any => Ok(value.clone()),
            FieldKind::Bool => value.as_bool().map(Value::Bool).ok_or_else(wrong_type),
            FieldKind::Int { min, max } => {
                let n = value.as_i64().ok_or_else(wrong_type)?;
                let below = min.is_some_and(|m| n < m);
                let above = max.is_some_and(|m| n > m);
                if below || above {
                    return Err(ValidationError::OutOfRange {
                        field: field.to_string(),
                        value: n as f64,
                        min: min.map_or(f64::NEG_INFINITY, |m| m as f64),
                        max: max.map_or(f64::INFINITY, |m| m as f64),
                    });
                }
                Ok(Value::from(n))
            }
            FieldKind::Float { min, max } => {
                let x = value.as_f64().ok_or_else(wrong_type)?;
                let below = min.is_some_and(|m| x < m);
                let above = max.is_some_and(|m| x > m);
                if below || above {
                    return Err(ValidationError::OutOfRange {
                        field: field.to_string(),
                        value: x,
                        min: min.unwrap_or(f64::NEG_INFINITY),
                        max: max.unwrap_or(f64::INFINITY),
                    });
                }
                Number::from_f64(x).map(Value::Number).ok_or_else(wrong_type)
            }
            FieldKind::Str => value
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(wrong_type),
            FieldKind::Choice(allowed) => {
                let s = value.as_str().ok_or_else(wrong_type)?;
                if allowed.iter().any(|a| a == s) {
                    Ok(Value::String(s.to_string()))
                } else {
                    Err(ValidationError::InvalidChoice {
                        field: field.to_string(),
                        value: s.to_string(),
                        allowed: allowed.clone(),
                    })
                }
            }
            FieldKind::List => {
                if value.is_array() {
                    Ok(value.clone())
                } else {
                    Err(wrong_type())
                }
            }
            FieldKind::Map => {
                if value.is_object() {
                    Ok(value.clone())
                } else {
                    Err(wrong_type())
                }
            }
            FieldKind::Nested(schema) => {
                let map = value.as_object().ok_or_else(wrong_type)?;
                schema
                    .normalize(map)
                    .map(Value::Object)
                    .map_err(|e| e.within(field))
            }
        }
    }
}

/// A declared field: name, kind, and optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key in the document.
    pub name: String,
    /// Type and constraints.
    pub kind: FieldKind,
    /// Value substituted when the key is absent. `None` leaves it absent.
    pub default: Option<Value>,
}

impl Field {
    /// Validate a value for this field.
    pub fn validate(&self, value: &Value) -> ValidationResult<Value> {
        self.kind.validate(&self.name, value)
    }
}
