//! End-to-end load and save behavior against a real directory.

use std::fs;
use std::path::Path;

use ledfx_config::backup::list_backups;
use ledfx_config::{
    CONFIGURATION_VERSION, ConfigDocument, ConfigEvent, ConfigLoader, RecordingObserver,
    load_config, save_config, save_presets,
};
use ledfx_registry::StaticRegistry;
use serde_json::{Value, json};
use tempfile::TempDir;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn write_config(dir: &Path, value: &Value) {
    fs::write(dir.join("config.json"), serde_json::to_string(value).unwrap()).unwrap();
}

#[test]
fn corrupt_file_recovers_with_one_backup() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.json"), "{\"host\": ").unwrap();
    let registry = StaticRegistry::new();
    let observer = RecordingObserver::new();

    let doc = load_config(temp_dir.path(), &registry, &observer);

    assert_eq!(doc, ConfigDocument::defaults());
    let backups = list_backups(temp_dir.path()).unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "{\"host\": ");
    assert!(observer.any(|e| matches!(e, ConfigEvent::BackupCreated { .. })));
}

#[test]
fn unreadable_file_recovers_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    // A directory where the file should be cannot be read as text.
    fs::create_dir(temp_dir.path().join("config.json")).unwrap();
    let registry = StaticRegistry::new();
    let observer = RecordingObserver::new();

    let doc = load_config(temp_dir.path(), &registry, &observer);

    assert_eq!(doc, ConfigDocument::defaults());
    assert!(!observer.any(|e| matches!(e, ConfigEvent::MigrationStarted)));
    assert!(observer.any(|e| matches!(e, ConfigEvent::RecoveredWithDefaults { .. })));
}

#[test]
fn save_then_load_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let registry = StaticRegistry::new();
    let observer = RecordingObserver::new();

    let mut doc = ConfigDocument::defaults();
    doc.insert("port", 9001);
    doc.insert("dev_mode", true);
    doc.insert(
        "devices",
        json!([{"id": "desk", "type": "wled", "config": {"name": "Desk", "pixel_count": 60}}]),
    );
    doc.insert("integrations", json!([{"id": "spotify"}]));
    doc.insert("ledfx_presets", json!({"rainbow": {"reset": {}}}));
    save_config(&mut doc, temp_dir.path(), &observer).unwrap();

    let loaded = load_config(temp_dir.path(), &registry, &observer);

    let mut expected = doc.clone();
    expected.insert("ledfx_presets", json!({}));
    assert_eq!(loaded, expected);
    assert!(list_backups(temp_dir.path()).unwrap().is_empty());
}

#[test]
fn save_stamps_current_version() {
    let temp_dir = TempDir::new().unwrap();
    let observer = RecordingObserver::new();
    let mut doc = ConfigDocument::defaults();
    doc.insert("configuration_version", "0.3.0");

    let path = save_config(&mut doc, temp_dir.path(), &observer).unwrap();

    assert_eq!(read_json(&path)["configuration_version"], CONFIGURATION_VERSION);
}

#[test]
fn stale_version_is_migrated() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        &json!({
            "devices": [{"id": "d1", "type": "UDP", "config": {"name": "Strip", "pixel_count": 10}}],
            "configuration_version": "0.9.0"
        }),
    );
    let registry = StaticRegistry::new();
    let observer = RecordingObserver::new();

    let doc = load_config(temp_dir.path(), &registry, &observer);

    assert_eq!(doc.version(), Some(CONFIGURATION_VERSION));
    let devices = doc.devices();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "d1");
    let virtuals = doc.virtuals();
    assert_eq!(virtuals.len(), 1);
    assert_eq!(virtuals[0].is_device.as_deref(), Some("d1"));
    assert_eq!(
        serde_json::to_value(&virtuals[0].segments).unwrap(),
        json!([["d1", 0, 9, false]])
    );
    assert_eq!(list_backups(temp_dir.path()).unwrap().len(), 1);
    // The migrated document is not written back until the host saves.
    assert!(!temp_dir.path().join("config.json").exists());
}

#[test]
fn legacy_presets_and_scenes_are_migrated() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        &json!({
            "devices": [{"id": "tv", "type": "wled", "config": {"name": "TV", "pixel_count": 100}}],
            "custom_presets": {
                "Rainbow (reactive)": {"calm": {"name": "Calm", "config": {"speed": 0.2, "old": true}}},
                "NoSuchEffect": {"x": {"name": "X", "config": {}}}
            },
            "scenes": {"movie": {"name": "Movie", "devices": {"tv": {"type": "gradient", "config": {}}}}},
            "crossfade": 1.0
        }),
    );
    let registry = StaticRegistry::new();
    let observer = RecordingObserver::new();

    let doc = load_config(temp_dir.path(), &registry, &observer);

    let presets = doc.user_presets();
    assert_eq!(presets.keys().collect::<Vec<_>>(), ["rainbow"]);
    assert_eq!(presets["rainbow"]["calm"].config, *json!({"speed": 0.2}).as_object().unwrap());
    let scenes = doc.scenes();
    assert_eq!(scenes["movie"].virtuals["tv"].effect_type, "gradient");
    assert!(doc.get("crossfade").is_none());
    assert!(doc.get("custom_presets").is_none());
}

#[test]
fn presets_file_contains_only_user_presets() {
    let temp_dir = TempDir::new().unwrap();
    let registry = StaticRegistry::new();
    let observer = RecordingObserver::new();
    let mut doc = ConfigDocument::defaults();
    doc.insert("user_presets", json!({"strobe": {"fast": {"name": "Fast", "config": {}}}}));

    let path = save_presets(&doc, temp_dir.path(), &observer).unwrap();

    assert_eq!(
        read_json(&path),
        json!({"user_presets": {"strobe": {"fast": {"name": "Fast", "config": {}}}}})
    );
    let loader = ConfigLoader::new(temp_dir.path(), &registry, &observer);
    assert!(loader.load_presets().unwrap().contains_key("strobe"));
}

#[test]
fn writing_to_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("gone");
    let observer = RecordingObserver::new();
    let mut doc = ConfigDocument::defaults();

    assert!(save_config(&mut doc, &missing, &observer).is_err());
    assert!(save_presets(&doc, &missing, &observer).is_err());
}
