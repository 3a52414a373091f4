//! Property-based tests for the schema normalizer.
//!
//! Uses proptest to generate arbitrary documents and verify that
//! normalization is idempotent and always fills declared defaults.

use ledfx_schema::{Document, ExtraFields, FieldKind, Schema, normalize};
use proptest::prelude::*;
use serde_json::{Value, json};

fn wled_preferences() -> Schema {
    Schema::open()
        .with_default(
            "wled_preferred_mode",
            FieldKind::Nested(Schema::setting_entry("UDP")),
            json!({"setting": "UDP", "user_enabled": false}),
        )
        .with_default(
            "realtime_gamma_enabled",
            FieldKind::Nested(Schema::setting_entry(false)),
            json!({"setting": false, "user_enabled": false}),
        )
        .with_default(
            "start_universe_setting",
            FieldKind::Nested(Schema::setting_entry(1)),
            json!({"setting": 1, "user_enabled": false}),
        )
}

fn test_schema() -> Schema {
    Schema::new()
        .with_default("host", FieldKind::Str, "0.0.0.0")
        .with_default("port", FieldKind::int(), 8888)
        .with_default("dev_mode", FieldKind::Bool, false)
        .with_default("devices", FieldKind::List, json!([]))
        .with_default("audio", FieldKind::Map, json!({}))
        .with_default("visualisation_fps", FieldKind::int_range(1, 60), 30)
        .with_default("brightness", FieldKind::float_range(0.0, 1.0), 1.0)
        .with_default("mode", FieldKind::choice(["UDP", "DDP"]), "UDP")
        .with_default("wled_preferences", FieldKind::Nested(wled_preferences()), json!({}))
        .with_extra(ExtraFields::Allow)
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-100i64..100).prop_map(Value::from),
        (-2.0f64..2.0).prop_map(Value::from),
        "[a-zA-Z]{0,6}".prop_map(Value::from),
        prop_oneof![Just("UDP"), Just("DDP")].prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map(
                prop_oneof![
                    Just("setting".to_string()),
                    Just("user_enabled".to_string()),
                    Just("wled_preferred_mode".to_string()),
                    Just("start_universe_setting".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..4,
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(
        prop_oneof![
            Just("host".to_string()),
            Just("port".to_string()),
            Just("dev_mode".to_string()),
            Just("devices".to_string()),
            Just("audio".to_string()),
            Just("visualisation_fps".to_string()),
            Just("brightness".to_string()),
            Just("mode".to_string()),
            Just("wled_preferences".to_string()),
            "[a-z_]{1,10}",
        ],
        value(),
        0..8,
    )
    .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Normalizing a normalized document changes nothing.
    #[test]
    fn normalize_is_idempotent(doc in document()) {
        let schema = test_schema();
        if let Ok(once) = schema.normalize(&doc) {
            let twice = schema.normalize(&once);
            prop_assert_eq!(twice, Ok(once));
        }
    }

    /// A successful normalization contains every field that has a default.
    #[test]
    fn normalize_fills_all_defaults(doc in document()) {
        let schema = test_schema();
        if let Ok(out) = schema.normalize(&doc) {
            for field in schema.fields() {
                prop_assert!(out.contains_key(&field.name), "missing {}", field.name);
            }
        }
    }

    /// Undeclared keys survive an open schema untouched.
    #[test]
    fn open_schema_preserves_extra_keys(doc in document()) {
        let schema = test_schema();
        if let Ok(out) = normalize(&schema, &Value::Object(doc.clone())) {
            for (key, value) in &doc {
                if !schema.contains(key) {
                    prop_assert_eq!(out.get(key), Some(value));
                }
            }
        }
    }

    /// In-range integers are accepted and out-of-range ones rejected.
    #[test]
    fn int_range_is_inclusive(n in -10i64..80) {
        let result = FieldKind::int_range(1, 60).validate("fps", &Value::from(n));
        prop_assert_eq!(result.is_ok(), (1..=60).contains(&n));
    }
}

#[test]
fn empty_document_normalizes_to_defaults() {
    let out = test_schema().normalize(&Document::new()).unwrap();
    assert_eq!(out["wled_preferences"]["start_universe_setting"]["setting"], 1);
    assert_eq!(out["mode"], "UDP");
}
