//! Persisting configuration documents.
//!
//! Output is deterministic: keys are sorted, indentation is four spaces and
//! non-ASCII text is written as UTF-8 rather than escaped. Targets are
//! overwritten in place and the directory must already exist.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ledfx_schema::Document;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::document::ConfigDocument;
use crate::error::ConfigError;
use crate::observer::{ConfigEvent, ConfigObserver};
use crate::paths::{config_file_path, presets_file_path};
use crate::schema::{CONFIGURATION_VERSION, TRANSIENT_KEYS, VERSION_KEY};

const INDENT: &[u8] = b"    ";

/// Serialize `value` the way config files are written.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if `value` cannot be encoded.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    serialize_into(&mut buf, value)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `value` to `path`, replacing any existing content.
///
/// # Errors
///
/// Returns [`ConfigError::WriteFile`] on I/O failure or
/// [`ConfigError::Serialize`] if `value` cannot be encoded.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let file = File::create(path).map_err(|e| ConfigError::write_file(path, e))?;
    let mut writer = BufWriter::new(file);
    serialize_into(&mut writer, value)?;
    writer.flush().map_err(|e| ConfigError::write_file(path, e))
}

fn serialize_into<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<(), ConfigError> {
    let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser).map_err(ConfigError::Serialize)
}

/// The part of `doc` that is written to disk: everything but transient keys.
pub fn persisted_view(doc: &ConfigDocument) -> Document {
    doc.as_map()
        .iter()
        .filter(|(key, _)| !TRANSIENT_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Save `doc` to `config.json` in `config_dir`.
///
/// Stamps `doc` with the current `configuration_version` first.
///
/// # Errors
///
/// Returns [`ConfigError::WriteFile`] if the file cannot be written, for
/// example because `config_dir` does not exist.
pub fn save_config(
    doc: &mut ConfigDocument,
    config_dir: &Path,
    observer: &dyn ConfigObserver,
) -> Result<PathBuf, ConfigError> {
    doc.insert(VERSION_KEY, CONFIGURATION_VERSION);

    let path = config_file_path(config_dir);
    observer.notify(ConfigEvent::Saving { path: path.clone() });
    write_json(&path, &persisted_view(doc))?;
    Ok(path)
}

/// Save the `user_presets` section of `doc` to `presets.json` in
/// `config_dir`. No other key is written.
///
/// # Errors
///
/// Returns [`ConfigError::WriteFile`] if the file cannot be written.
pub fn save_presets(
    doc: &ConfigDocument,
    config_dir: &Path,
    observer: &dyn ConfigObserver,
) -> Result<PathBuf, ConfigError> {
    let presets = doc
        .get("user_presets")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let mut out = Map::new();
    out.insert("user_presets".to_string(), presets);

    let path = presets_file_path(config_dir);
    observer.notify(ConfigEvent::Saving { path: path.clone() });
    write_json(&path, &out)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pretty_json_format() {
        let text = to_pretty_json(&json!({"b": 1, "a": {"name": "Küche"}})).unwrap();
        assert_eq!(
            text,
            "{\n    \"a\": {\n        \"name\": \"Küche\"\n    },\n    \"b\": 1\n}"
        );
    }

    #[test]
    fn test_save_stamps_version_and_drops_transient() {
        let temp_dir = TempDir::new().unwrap();
        let mut doc = ConfigDocument::defaults();
        doc.insert(VERSION_KEY, "0.1.0");
        doc.insert("ledfx_presets", json!({"rainbow": {}}));

        let path = save_config(&mut doc, temp_dir.path(), &NullObserver).unwrap();

        assert_eq!(doc.version(), Some(CONFIGURATION_VERSION));
        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written[VERSION_KEY], CONFIGURATION_VERSION);
        assert!(written.get("ledfx_presets").is_none());
        // Transient data stays available in memory.
        assert!(doc.get("ledfx_presets").is_some());
    }

    #[test]
    fn test_save_presets_only_user_presets() {
        let temp_dir = TempDir::new().unwrap();
        let mut doc = ConfigDocument::defaults();
        doc.insert(
            "user_presets",
            json!({"rainbow": {"slow": {"name": "Slow", "config": {"speed": 0.5}}}}),
        );

        let path = save_presets(&doc, temp_dir.path(), &NullObserver).unwrap();
        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["user_presets"]);
        assert_eq!(written["user_presets"]["rainbow"]["slow"]["name"], "Slow");
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let mut doc = ConfigDocument::defaults();

        let err = save_config(&mut doc, &missing, &NullObserver).unwrap_err();
        assert!(matches!(err, ConfigError::WriteFile { .. }));
        assert!(!missing.exists());
    }
}
