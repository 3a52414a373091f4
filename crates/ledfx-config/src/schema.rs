//! The core configuration schema.

use std::sync::LazyLock;

use ledfx_schema::{Document, ExtraFields, FieldKind, Schema};
use serde_json::{Value, json};

/// Schema version written into every saved document.
pub const CONFIGURATION_VERSION: &str = "2.0.0";

/// Key holding the document's schema version.
pub const VERSION_KEY: &str = "configuration_version";

/// Keys derived at runtime that are never persisted.
pub const TRANSIENT_KEYS: &[&str] = &["ledfx_presets"];

/// WLED preference keys and their default settings.
pub const WLED_DEFAULTS: &[(&str, WledDefault)] = &[
    ("wled_preferred_mode", WledDefault::Str("UDP")),
    ("realtime_gamma_enabled", WledDefault::Bool(false)),
    ("force_max_brightness", WledDefault::Bool(false)),
    ("realtime_dmx_mode", WledDefault::Str("MultiRGB")),
    ("start_universe_setting", WledDefault::Int(1)),
    ("dmx_address_start", WledDefault::Int(1)),
    ("inactivity_timeout", WledDefault::Int(1)),
];

/// Default value of a WLED preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WledDefault {
    /// String setting
    Str(&'static str),
    /// Boolean setting
    Bool(bool),
    /// Integer setting
    Int(i64),
}

impl From<WledDefault> for Value {
    fn from(default: WledDefault) -> Self {
        match default {
            WledDefault::Str(s) => Value::from(s),
            WledDefault::Bool(b) => Value::from(b),
            WledDefault::Int(n) => Value::from(n),
        }
    }
}

static WLED_PREFERENCES_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    WLED_DEFAULTS
        .iter()
        .fold(Schema::open(), |schema, &(key, default)| {
            schema.with_default(
                key,
                FieldKind::Nested(Schema::setting_entry(default)),
                json!({"setting": Value::from(default), "user_enabled": false}),
            )
        })
});

static CORE_CONFIG_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .with_default("host", FieldKind::Str, "0.0.0.0")
        .with_default("port", FieldKind::int(), 8888)
        .with_default("port_s", FieldKind::int(), 8443)
        .with_default("dev_mode", FieldKind::Bool, false)
        .with_default("devices", FieldKind::List, json!([]))
        .with_default("virtuals", FieldKind::List, json!([]))
        .with_default("audio", FieldKind::Map, json!({}))
        .with_default("melbanks", FieldKind::Map, json!({}))
        .with_default("ledfx_presets", FieldKind::Map, json!({}))
        .with_default("user_presets", FieldKind::Map, json!({}))
        .with_default("scenes", FieldKind::Map, json!({}))
        .with_default("integrations", FieldKind::List, json!([]))
        .with_default("visualisation_fps", FieldKind::int_range(1, 60), 30)
        .with_default("visualisation_maxlen", FieldKind::int_range(5, 300), 50)
        .with_default("scan_on_startup", FieldKind::Bool, false)
        .with_default(
            "wled_preferences",
            FieldKind::Nested(WLED_PREFERENCES_SCHEMA.clone()),
            json!({}),
        )
        .with_default(VERSION_KEY, FieldKind::Str, CONFIGURATION_VERSION)
        .with_extra(ExtraFields::Allow)
});

/// Schema of the `wled_preferences` section.
///
/// Each preference is a `{setting, user_enabled}` entry whose `setting`
/// keeps the type of its default. Preferences this build does not know
/// are passed through.
pub fn wled_preferences_schema() -> &'static Schema {
    &WLED_PREFERENCES_SCHEMA
}

/// Schema of the whole configuration document. Unknown keys are preserved.
pub fn core_config_schema() -> &'static Schema {
    &CORE_CONFIG_SCHEMA
}

/// The document produced by normalizing an empty object.
pub fn default_document() -> Document {
    // Every default in the core schema satisfies its own field; see tests.
    core_config_schema().defaults().unwrap_or_default()
}
