//! The configuration document and typed views of its entities.
//!
//! [`ConfigDocument`] owns the raw JSON object so that unknown keys survive
//! every load and save. The entity structs ([`Device`], [`Virtual`],
//! [`Scene`], ...) are views decoded on demand; each carries a flattened
//! `extra` map so a decode-encode cycle keeps fields it does not name.

use std::collections::BTreeMap;

use ledfx_schema::Document;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{VERSION_KEY, default_document};

/// A configuration document: a JSON object of named sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Document);

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<Document> for ConfigDocument {
    fn from(map: Document) -> Self {
        Self(map)
    }
}

impl ConfigDocument {
    /// Wrap an existing JSON object.
    pub fn new(map: Document) -> Self {
        Self(map)
    }

    /// The schema-default document.
    pub fn defaults() -> Self {
        Self(default_document())
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Document {
        &self.0
    }

    /// Mutably borrow the underlying JSON object.
    pub fn as_map_mut(&mut self) -> &mut Document {
        &mut self.0
    }

    /// Unwrap into the underlying JSON object.
    pub fn into_map(self) -> Document {
        self.0
    }

    /// Get a section by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a section, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a section.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// The document's `configuration_version`, if it is a string.
    pub fn version(&self) -> Option<&str> {
        self.0.get(VERSION_KEY).and_then(Value::as_str)
    }

    /// Decode the `devices` section.
    ///
    /// Entries that do not decode are skipped.
    pub fn devices(&self) -> Vec<Device> {
        self.list("devices")
    }

    /// Decode the `virtuals` section.
    ///
    /// Entries that do not decode are skipped.
    pub fn virtuals(&self) -> Vec<Virtual> {
        self.list("virtuals")
    }

    /// Decode the `user_presets` section.
    pub fn user_presets(&self) -> UserPresets {
        self.section("user_presets").unwrap_or_default()
    }

    /// Decode the `scenes` section.
    pub fn scenes(&self) -> BTreeMap<String, Scene> {
        self.section("scenes").unwrap_or_default()
    }

    /// Decode one entry of `wled_preferences`.
    pub fn wled_preference<T: DeserializeOwned>(&self, key: &str) -> Option<WledSetting<T>> {
        let entry = self.0.get("wled_preferences")?.get(key)?;
        serde_json::from_value(entry.clone()).ok()
    }

    fn section<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        serde_json::from_value(self.0.get(key)?.clone()).ok()
    }

    fn list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A light-output endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device id.
    pub id: String,
    /// Device driver type, e.g. `"wled"` or `"udp"`.
    #[serde(rename = "type")]
    pub device_type: String,
    /// Device configuration.
    pub config: DeviceConfig,
    /// Fields not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration block of a [`Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Display name.
    pub name: String,
    /// Number of pixels driven by the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_count: Option<u32>,
    /// Fields not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An addressable strip built from device pixel ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Virtual {
    /// Unique virtual id.
    pub id: String,
    /// Device this virtual was generated for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_device: Option<String>,
    /// Virtual configuration.
    pub config: VirtualConfig,
    /// Pixel ranges, in strip order.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Fields not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration block of a [`Virtual`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualConfig {
    /// Display name.
    pub name: String,
    /// Fields not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A contiguous pixel range of a device. Serialized as
/// `[device, start, end, reversed]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u32, u32, bool)", into = "(String, u32, u32, bool)")]
pub struct Segment {
    /// Device id.
    pub device: String,
    /// First pixel, inclusive.
    pub start: u32,
    /// Last pixel, inclusive.
    pub end: u32,
    /// Whether the range is played back to front.
    pub reversed: bool,
}

impl From<(String, u32, u32, bool)> for Segment {
    fn from((device, start, end, reversed): (String, u32, u32, bool)) -> Self {
        Self {
            device,
            start,
            end,
            reversed,
        }
    }
}

impl From<Segment> for (String, u32, u32, bool) {
    fn from(segment: Segment) -> Self {
        (segment.device, segment.start, segment.end, segment.reversed)
    }
}

/// A named, saved configuration for one effect type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name.
    pub name: String,
    /// Effect configuration.
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// `user_presets`: effect id, then preset id.
pub type UserPresets = BTreeMap<String, BTreeMap<String, Preset>>;

/// A named snapshot of effect assignments across virtuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Display name.
    pub name: String,
    /// Effect assignment per virtual id.
    #[serde(default)]
    pub virtuals: BTreeMap<String, SceneEffect>,
    /// Fields not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The effect a scene assigns to one virtual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEffect {
    /// Effect id.
    #[serde(rename = "type")]
    pub effect_type: String,
    /// Effect configuration.
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A WLED preference: the effective value and whether the user set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WledSetting<T> {
    /// Effective value.
    pub setting: T,
    /// Whether the value overrides the device's own setting.
    pub user_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        match value {
            Value::Object(map) => ConfigDocument::new(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_defaults_have_current_version() {
        let doc = ConfigDocument::default();
        assert_eq!(doc.version(), Some(crate::CONFIGURATION_VERSION));
        assert!(doc.devices().is_empty());
    }

    #[test]
    fn test_device_round_trip_keeps_extra() {
        let raw = json!({
            "id": "d1",
            "type": "wled",
            "config": {"name": "Strip", "pixel_count": 10, "ip_address": "10.0.0.2"},
            "future_field": true
        });
        let device: Device = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(device.device_type, "wled");
        assert_eq!(device.config.pixel_count, Some(10));
        assert_eq!(device.config.extra["ip_address"], "10.0.0.2");
        assert_eq!(serde_json::to_value(&device).unwrap(), raw);
    }

    #[test]
    fn test_segment_is_a_tuple() {
        let segment = Segment {
            device: "d1".to_string(),
            start: 0,
            end: 9,
            reversed: false,
        };
        assert_eq!(
            serde_json::to_value(&segment).unwrap(),
            json!(["d1", 0, 9, false])
        );
        let back: Segment = serde_json::from_value(json!(["d1", 0, 9, false])).unwrap();
        assert_eq!(back, segment);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let d = doc(json!({
            "devices": [
                {"id": "d1", "type": "udp", "config": {"name": "A"}},
                {"id": "d2"},
                "garbage"
            ]
        }));
        let devices = d.devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, "d1");
    }

    #[test]
    fn test_virtuals_view() {
        let d = doc(json!({
            "virtuals": [{
                "id": "strip",
                "is_device": "d1",
                "config": {"name": "Strip"},
                "segments": [["d1", 0, 9, false]]
            }]
        }));
        let virtuals = d.virtuals();
        assert_eq!(virtuals[0].is_device.as_deref(), Some("d1"));
        assert_eq!(virtuals[0].segments[0].end, 9);
    }

    #[test]
    fn test_presets_and_scenes_views() {
        let d = doc(json!({
            "user_presets": {"rainbow": {"slow": {"name": "Slow", "config": {"speed": 0.5}}}},
            "scenes": {"party": {"name": "Party", "virtuals": {"strip": {"type": "energy", "config": {}}}}}
        }));
        assert_eq!(d.user_presets()["rainbow"]["slow"].name, "Slow");
        assert_eq!(d.scenes()["party"].virtuals["strip"].effect_type, "energy");
    }

    #[test]
    fn test_wled_preference() {
        let d = ConfigDocument::defaults();
        let mode: WledSetting<String> = d.wled_preference("wled_preferred_mode").unwrap();
        assert_eq!(mode.setting, "UDP");
        assert!(!mode.user_enabled);
        assert!(d.wled_preference::<bool>("wled_preferred_mode").is_none());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut d = ConfigDocument::defaults();
        d.insert("port", 9000);
        assert_eq!(d.get("port"), Some(&json!(9000)));
        assert!(d.remove("port").is_some());
        assert!(d.get("port").is_none());
    }

    #[test]
    fn test_transparent_serialization() {
        let d = doc(json!({"host": "localhost"}));
        assert_eq!(serde_json::to_value(&d).unwrap(), json!({"host": "localhost"}));
    }
}
