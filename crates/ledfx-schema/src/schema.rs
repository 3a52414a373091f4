//! Schema declarations and the generic normalizer.

use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult, json_type_name};
use crate::field::{Field, FieldKind};

/// A JSON object document.
pub type Document = Map<String, Value>;

/// What to do with keys a schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    /// Undeclared keys are copied through unchanged.
    Allow,
    /// Undeclared keys are reported as [`ValidationError::UnknownField`].
    #[default]
    Reject,
}

/// Declarative description of a JSON object.
///
/// A schema is a list of [`Field`]s plus an [`ExtraFields`] policy. It is
/// consumed by [`Schema::normalize`], which fills defaults, checks types and
/// constraints, and recurses into nested schemas.
///
/// # Example
///
/// ```rust
/// use ledfx_schema::{FieldKind, Schema};
/// use serde_json::json;
///
/// let schema = Schema::open()
///     .with_default("host", FieldKind::Str, "0.0.0.0")
///     .with_default("visualisation_fps", FieldKind::int_range(1, 60), 30);
///
/// let doc = json!({"visualisation_fps": 45, "custom": true});
/// let normalized = schema.normalize(doc.as_object().unwrap()).unwrap();
///
/// assert_eq!(normalized["host"], "0.0.0.0");
/// assert_eq!(normalized["visualisation_fps"], 45);
/// assert_eq!(normalized["custom"], true);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<Field>,
    extra: ExtraFields,
}

impl Schema {
    /// Create an empty closed schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty schema that passes undeclared keys through.
    pub fn open() -> Self {
        Self {
            fields: Vec::new(),
            extra: ExtraFields::Allow,
        }
    }

    /// Declare an optional field without a default.
    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(Field {
            name: name.into(),
            kind,
            default: None,
        })
    }

    /// Declare an optional field with a default.
    pub fn with_default(
        self,
        name: impl Into<String>,
        kind: FieldKind,
        default: impl Into<Value>,
    ) -> Self {
        self.push(Field {
            name: name.into(),
            kind,
            default: Some(default.into()),
        })
    }

    /// Set the policy for undeclared keys.
    pub fn with_extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Schema of a setting entry: `{setting: <type of default>, user_enabled: bool}`.
    ///
    /// Both keys are optional; `setting` defaults to `default` and
    /// `user_enabled` to `false`. Other keys are kept as they are.
    pub fn setting_entry(default: impl Into<Value>) -> Self {
        let default = default.into();
        Self::open()
            .with_default("setting", FieldKind::infer(&default), default)
            .with_default("user_enabled", FieldKind::Bool, false)
    }

    fn push(mut self, field: Field) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Policy for undeclared keys.
    pub fn extra(&self) -> ExtraFields {
        self.extra
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of all declared fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Validate one value against the declared field `name`.
    ///
    /// Returns [`ValidationError::UnknownField`] if the field is not declared.
    pub fn validate_field(&self, name: &str, value: &Value) -> ValidationResult<Value> {
        self.field(name)
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?
            .validate(value)
    }

    /// The document produced by normalizing an empty object.
    pub fn defaults(&self) -> ValidationResult<Document> {
        self.normalize(&Document::new())
    }

    /// Normalize `document` against this schema.
    ///
    /// Absent fields with a default receive it; present fields are checked
    /// and coerced; undeclared fields follow the [`ExtraFields`] policy.
    /// Every field is checked and all errors are reported together.
    /// Normalizing an already-normalized document returns it unchanged.
    pub fn normalize(&self, document: &Document) -> ValidationResult<Document> {
        let mut out = Document::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            let Some(value) = document.get(&field.name).or(field.default.as_ref()) else {
                continue;
            };
            match field.validate(value) {
                Ok(value) => {
                    out.insert(field.name.clone(), value);
                }
                Err(e) => errors.push(e),
            }
        }

        for (key, value) in document {
            if self.contains(key) {
                continue;
            }
            match self.extra {
                ExtraFields::Allow => {
                    out.insert(key.clone(), value.clone());
                }
                ExtraFields::Reject => errors.push(ValidationError::UnknownField(key.clone())),
            }
        }

        ValidationError::collect(errors).map(|()| out)
    }

    /// Normalize an arbitrary JSON value, which must be an object.
    pub fn normalize_value(&self, value: &Value) -> ValidationResult<Document> {
        let document = value.as_object().ok_or(ValidationError::NotAnObject {
            found: json_type_name(value),
        })?;
        self.normalize(document)
    }
}

/// Normalize `document` against `schema`.
///
/// Convenience wrapper around [`Schema::normalize_value`].
pub fn normalize(schema: &Schema, document: &Value) -> ValidationResult<Document> {
    schema.normalize_value(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wled_like() -> Schema {
        Schema::new()
            .with_default(
                "wled_preferred_mode",
                FieldKind::Nested(Schema::setting_entry("UDP")),
                json!({"setting": "UDP", "user_enabled": false}),
            )
            .with_default(
                "inactivity_timeout",
                FieldKind::Nested(Schema::setting_entry(1)),
                json!({"setting": 1, "user_enabled": false}),
            )
    }

    fn core_like() -> Schema {
        Schema::open()
            .with_default("host", FieldKind::Str, "0.0.0.0")
            .with_default("port", FieldKind::int(), 8888)
            .with_default("dev_mode", FieldKind::Bool, false)
            .with_default("devices", FieldKind::List, json!([]))
            .with_default("visualisation_fps", FieldKind::int_range(1, 60), 30)
            .with_default("wled_preferences", FieldKind::Nested(wled_like()), json!({}))
    }

    #[test]
    fn test_defaults_filled() {
        let doc = core_like().defaults().unwrap();
        assert_eq!(doc["host"], "0.0.0.0");
        assert_eq!(doc["port"], 8888);
        assert_eq!(doc["dev_mode"], false);
        assert_eq!(doc["devices"], json!([]));
        assert_eq!(doc["visualisation_fps"], 30);
    }

    #[test]
    fn test_nested_default_is_expanded() {
        let doc = core_like().defaults().unwrap();
        assert_eq!(
            doc["wled_preferences"],
            json!({
                "wled_preferred_mode": {"setting": "UDP", "user_enabled": false},
                "inactivity_timeout": {"setting": 1, "user_enabled": false},
            })
        );
    }

    #[test]
    fn test_present_values_kept() {
        let doc = json!({"host": "127.0.0.1", "port": 9000});
        let out = normalize(&core_like(), &doc).unwrap();
        assert_eq!(out["host"], "127.0.0.1");
        assert_eq!(out["port"], 9000);
    }

    #[test]
    fn test_open_schema_passes_extra() {
        let doc = json!({"my_plugin": {"enabled": true}});
        let out = normalize(&core_like(), &doc).unwrap();
        assert_eq!(out["my_plugin"], json!({"enabled": true}));
    }

    #[test]
    fn test_closed_schema_rejects_extra() {
        let schema = Schema::new().optional("speed", FieldKind::float());
        let err = normalize(&schema, &json!({"speed": 1.0, "sped": 2.0})).unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("sped".into()));
    }

    #[test]
    fn test_all_errors_reported() {
        let doc = json!({"port": "eighty", "visualisation_fps": 500, "dev_mode": "no"});
        let err = normalize(&core_like(), &doc).unwrap_err();
        assert_eq!(err.count(), 3);
    }

    #[test]
    fn test_optional_without_default_stays_absent() {
        let schema = Schema::new().optional("name", FieldKind::Str);
        let out = schema.defaults().unwrap();
        assert!(!out.contains_key("name"));
    }

    #[test]
    fn test_not_an_object() {
        let err = normalize(&core_like(), &json!([1, 2])).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject { found: "list" });
    }

    #[test]
    fn test_setting_entry_fills_partial() {
        let schema = wled_like();
        let doc = json!({"inactivity_timeout": {"user_enabled": true}});
        let out = normalize(&schema, &doc).unwrap();
        assert_eq!(
            out["inactivity_timeout"],
            json!({"setting": 1, "user_enabled": true})
        );
    }

    #[test]
    fn test_setting_entry_keeps_default_type() {
        let schema = wled_like();
        let doc = json!({"wled_preferred_mode": {"setting": 5}});
        let err = normalize(&schema, &doc).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongType { ref field, expected: "string", .. }
                if field == "wled_preferred_mode.setting"
        ));
    }

    #[test]
    fn test_setting_entry_keeps_extra_keys() {
        let entry = Schema::setting_entry(1);
        let out = normalize(&entry, &json!({"setting": 3, "source": "wled"})).unwrap();
        assert_eq!(
            Value::Object(out),
            json!({"setting": 3, "user_enabled": false, "source": "wled"})
        );
    }

    #[test]
    fn test_redeclaring_field_replaces_it() {
        let schema = Schema::new()
            .with_default("x", FieldKind::int(), 1)
            .with_default("x", FieldKind::int(), 2);
        assert_eq!(schema.fields().len(), 1);
        assert_eq!(schema.defaults().unwrap()["x"], 2);
    }

    #[test]
    fn test_validate_field() {
        let schema = Schema::new().optional("speed", FieldKind::float_range(0.0, 10.0));
        assert!(schema.validate_field("speed", &json!(5)).is_ok());
        assert!(schema.validate_field("speed", &json!(50)).is_err());
        assert_eq!(
            schema.validate_field("nope", &json!(1)),
            Err(ValidationError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn test_normalize_twice_is_stable() {
        let doc = json!({
            "port": 1234,
            "wled_preferences": {"inactivity_timeout": {"setting": 7}},
            "extra": [1, 2, 3],
        });
        let once = normalize(&core_like(), &doc).unwrap();
        let twice = core_like().normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_field_names_in_declaration_order() {
        let names: Vec<_> = wled_like().field_names().map(str::to_owned).collect();
        assert_eq!(names, vec!["wled_preferred_mode", "inactivity_timeout"]);
    }
}
