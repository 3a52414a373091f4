//! Declarative document schemas for LedFx configuration.
//!
//! A [`Schema`] describes a JSON object as a list of typed, optional fields
//! with defaults. [`normalize`] consumes a schema and a raw document and
//! produces a normalized document (defaults filled, types checked, ranges
//! enforced, nested objects recursed into) or a [`ValidationError`] listing
//! every offending field.
//!
//! # Features
//!
//! - **Typed fields**: bool, int, float, string, choice, list, map, nested
//! - **Ranges**: inclusive bounds on ints and floats
//! - **Open schemas**: undeclared keys pass through with [`ExtraFields::Allow`]
//! - **Setting entries**: `{setting, user_enabled}` pairs via [`Schema::setting_entry`]
//!
//! # Example
//!
//! ```rust
//! use ledfx_schema::{normalize, FieldKind, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .with_default("speed", FieldKind::float_range(0.1, 10.0), 1.0)
//!     .with_default("mirror", FieldKind::Bool, false);
//!
//! let config = normalize(&schema, &json!({"speed": 3})).unwrap();
//! assert_eq!(config["speed"], 3.0);
//! assert_eq!(config["mirror"], false);
//!
//! assert!(normalize(&schema, &json!({"speed": 30})).is_err());
//! ```

mod error;
mod field;
mod schema;

pub use error::{ValidationError, ValidationResult, json_type_name};
pub use field::{Field, FieldKind};
pub use schema::{Document, ExtraFields, Schema, normalize};
