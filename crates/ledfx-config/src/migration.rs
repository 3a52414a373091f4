//! Migration of old configuration documents.
//!
//! [`Migrator::migrate`] rewrites an old-format document into the current
//! entity model. It only fails when the input is not a JSON object. Every
//! malformed or obsolete entity (device, preset, preset field, scene entry)
//! is dropped on its own and reported to the observer, so one bad entry never
//! costs the rest of the document.
//!
//! # Steps
//!
//! 1. Drop `audio` unless it names an `audio_device`
//! 2. Drop deprecated transition keys
//! 3. Rebuild `devices`, skipping unsupported types and stale `effect` keys
//! 4. Generate one virtual per device if there are no virtuals
//! 5. Rebuild `user_presets` (merged with legacy `custom_presets`) under
//!    current effect ids, with per-field sanitization
//! 6. Rebuild `scenes` against the virtuals

use std::collections::{BTreeMap, HashSet};

use ledfx_registry::EffectRegistry;
use ledfx_schema::{Document, json_type_name};
use serde_json::{Map, Value};

use crate::document::{Preset, Scene, SceneEffect, Segment, UserPresets, Virtual, VirtualConfig};
use crate::error::ConfigError;
use crate::observer::{ConfigEvent, ConfigObserver};
use crate::schema::{CONFIGURATION_VERSION, VERSION_KEY};

/// Device types that are no longer supported.
pub const UNSUPPORTED_DEVICE_TYPES: &[&str] = &["fxmatrix"];

/// Top-level keys superseded by per-effect settings.
pub const DEPRECATED_KEYS: &[&str] = &["crossfade", "fade", "transition_mode", "transition_time"];

const REACTIVE_MARKER: &str = "(reactive)";

/// Normalize an effect id for matching.
///
/// Lower-cases, strips a trailing `(reactive)` marker, removes underscores
/// and trims whitespace: `"Real_Strobe (Reactive)"` becomes `"realstrobe"`.
pub fn normalize_effect_id(id: &str) -> String {
    let lower = id.trim().to_lowercase();
    let stripped = lower.strip_suffix(REACTIVE_MARKER).unwrap_or(&lower);
    stripped.trim().replace('_', "")
}

/// Derive an id from a display name.
///
/// Runs of ASCII letters and digits are lower-cased and joined with `-`.
/// Returns an empty string if the name has none.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Rewrites old documents using an effect registry.
pub struct Migrator<'a> {
    registry: &'a dyn EffectRegistry,
    observer: &'a dyn ConfigObserver,
}

impl<'a> Migrator<'a> {
    /// Create a migrator.
    pub fn new(registry: &'a dyn EffectRegistry, observer: &'a dyn ConfigObserver) -> Self {
        Self { registry, observer }
    }

    /// Migrate `old` to the current document shape.
    ///
    /// Keys the migration does not know about are carried over. The result
    /// is stamped with the current `configuration_version` but is not yet
    /// validated against the core schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Migration`] if `old` is not a JSON object, or
    /// [`ConfigError::Serialize`] if a rebuilt section cannot be encoded.
    pub fn migrate(&self, old: &Value) -> Result<Document, ConfigError> {
        let Value::Object(old) = old else {
            return Err(ConfigError::Migration(format!(
                "expected a JSON object, found {}",
                json_type_name(old)
            )));
        };
        self.observer.notify(ConfigEvent::MigrationStarted);

        let mut doc = old.clone();

        if !has_audio_device(old) {
            doc.remove("audio");
        }
        for key in DEPRECATED_KEYS {
            doc.remove(*key);
        }

        let devices = self.migrate_devices(old.get("devices"));
        let virtuals = match old.get("virtuals") {
            Some(Value::Array(existing)) if !existing.is_empty() => existing.clone(),
            _ => {
                let generated = self.synthesize_virtuals(&devices);
                to_value(&generated)?
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
            }
        };

        let user_presets = self.migrate_user_presets(old);
        let scenes = self.migrate_scenes(old.get("scenes"), &virtuals);

        doc.remove("custom_presets");
        doc.insert("devices".to_string(), Value::Array(devices));
        doc.insert("virtuals".to_string(), Value::Array(virtuals));
        doc.insert("user_presets".to_string(), to_value(&user_presets)?);
        doc.insert("scenes".to_string(), to_value(&scenes)?);
        doc.insert(VERSION_KEY.to_string(), CONFIGURATION_VERSION.into());

        self.observer.notify(ConfigEvent::MigrationFinished);
        Ok(doc)
    }

    /// Keep well-formed devices of supported types, without their `effect`.
    ///
    /// Entries without a string `id`, a string `type` and a `config.name`
    /// are skipped, as are repeated ids.
    pub fn migrate_devices(&self, devices: Option<&Value>) -> Vec<Value> {
        let Some(Value::Array(entries)) = devices else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let id = entry.get("id").and_then(Value::as_str);
            let label = id.map_or_else(|| format!("#{index}"), str::to_string);

            if let Err(reason) = check_device(entry) {
                self.skip_device(label, reason);
                continue;
            }
            let device_type = entry
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            if UNSUPPORTED_DEVICE_TYPES.contains(&device_type.as_str()) {
                self.skip_device(
                    label,
                    format!("{device_type} devices are no longer supported, add it as plain UDP or WLED"),
                );
                continue;
            }
            if !seen.insert(label.clone()) {
                self.skip_device(label, "duplicate device id".to_string());
                continue;
            }

            let mut device = entry.clone();
            if let Value::Object(map) = &mut device {
                map.remove("effect");
            }
            out.push(device);
        }
        out
    }

    /// Generate one single-segment virtual per device.
    ///
    /// Ids are derived from device names and made unique with `-2`, `-3`...
    /// in device order. Devices without pixels get no virtual.
    pub fn synthesize_virtuals(&self, devices: &[Value]) -> Vec<Virtual> {
        let mut taken = HashSet::new();
        let mut out = Vec::with_capacity(devices.len());

        for device in devices {
            let (Some(device_id), Some(name)) = (
                device.get("id").and_then(Value::as_str),
                device.pointer("/config/name").and_then(Value::as_str),
            ) else {
                continue;
            };

            let pixel_count = device
                .pointer("/config/pixel_count")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok());
            let Some(end) = pixel_count.and_then(|n| n.checked_sub(1)) else {
                self.observer.notify(ConfigEvent::VirtualSkipped {
                    device: device_id.to_string(),
                    reason: "device has no pixels".to_string(),
                });
                continue;
            };

            let id = unique_id(&base_virtual_id(name, device_id), &mut taken);
            self.observer.notify(ConfigEvent::VirtualCreated {
                id: id.clone(),
                device: device_id.to_string(),
            });
            out.push(Virtual {
                id,
                is_device: Some(device_id.to_string()),
                config: VirtualConfig {
                    name: name.to_string(),
                    extra: Map::new(),
                },
                segments: vec![Segment {
                    device: device_id.to_string(),
                    start: 0,
                    end,
                    reversed: false,
                }],
                extra: Map::new(),
            });
        }
        out
    }

    /// Find the registry id an old effect id refers to.
    pub fn match_effect_id(&self, old_id: &str) -> Option<String> {
        let wanted = normalize_effect_id(old_id);
        if wanted.is_empty() {
            return None;
        }
        self.registry
            .effect_ids()
            .into_iter()
            .find(|id| normalize_effect_id(id) == wanted)
            .map(str::to_string)
    }

    /// Keep only the fields of `config` that `effect`'s schema declares and
    /// accepts.
    pub fn sanitize_effect_config(&self, effect: &str, config: &Map<String, Value>) -> Map<String, Value> {
        let Some(schema) = self.registry.field_schema(effect) else {
            return Map::new();
        };

        let mut out = Map::new();
        for (key, value) in config {
            if !schema.contains(key) {
                self.discard_field(effect, key, "no longer an option".to_string());
                continue;
            }
            match schema.validate_field(key, value) {
                Ok(valid) => {
                    out.insert(key.clone(), valid);
                }
                Err(e) => self.discard_field(effect, key, e.to_string()),
            }
        }
        out
    }

    /// Rebuild `user_presets` under current effect ids.
    ///
    /// Legacy `custom_presets` are merged over `user_presets`. Presets of old
    /// ids that map to the same current id are merged.
    pub fn migrate_user_presets(&self, old: &Document) -> UserPresets {
        let mut out = UserPresets::new();
        for source in ["user_presets", "custom_presets"] {
            let Some(Value::Object(by_effect)) = old.get(source) else {
                continue;
            };

            for (old_id, presets) in by_effect {
                let Value::Object(presets) = presets else {
                    self.observer.notify(ConfigEvent::PresetDiscarded {
                        effect: old_id.clone(),
                        preset: "*".to_string(),
                        reason: format!("expected an object, found {}", json_type_name(presets)),
                    });
                    continue;
                };
                let Some(effect) = self.match_effect_id(old_id) else {
                    self.observer.notify(ConfigEvent::EffectUnmatched {
                        effect: old_id.clone(),
                        context: source.to_string(),
                    });
                    continue;
                };

                let target = out.entry(effect.clone()).or_default();
                for (preset_id, preset) in presets {
                    let Some(config) = preset.get("config").and_then(Value::as_object) else {
                        self.observer.notify(ConfigEvent::PresetDiscarded {
                            effect: effect.clone(),
                            preset: preset_id.clone(),
                            reason: "missing config".to_string(),
                        });
                        continue;
                    };
                    let name = preset
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or(preset_id)
                        .to_string();
                    let config = self.sanitize_effect_config(&effect, config);
                    target.insert(preset_id.clone(), Preset { name, config });
                }
            }
        }
        out
    }

    /// Rebuild `scenes` against `virtuals`.
    ///
    /// Old scenes assign effects per device under `devices`; each device is
    /// mapped to the virtual generated for it. Scenes already keyed by
    /// virtual under `virtuals` keep entries whose virtual exists.
    pub fn migrate_scenes(&self, scenes: Option<&Value>, virtuals: &[Value]) -> BTreeMap<String, Scene> {
        let Some(Value::Object(scenes)) = scenes else {
            return BTreeMap::new();
        };

        let mut out = BTreeMap::new();
        for (scene_id, scene) in scenes {
            let Value::Object(scene) = scene else {
                self.observer.notify(ConfigEvent::SceneDiscarded {
                    scene: scene_id.clone(),
                    reason: format!("expected an object, found {}", json_type_name(scene)),
                });
                continue;
            };

            let mut entries = BTreeMap::new();
            if let Some(Value::Object(devices)) = scene.get("devices") {
                for (device, effect) in devices {
                    let Some(virtual_id) = virtual_for_device(virtuals, device) else {
                        self.observer.notify(ConfigEvent::SceneDeviceUnmatched {
                            scene: scene_id.clone(),
                            device: device.clone(),
                        });
                        continue;
                    };
                    if let Some(effect) = self.migrate_scene_effect(scene_id, effect) {
                        entries.insert(virtual_id.to_string(), effect);
                    }
                }
            } else if let Some(Value::Object(assigned)) = scene.get("virtuals") {
                for (virtual_id, effect) in assigned {
                    if !virtuals.iter().any(|v| virtual_id_of(v) == Some(virtual_id.as_str())) {
                        self.observer.notify(ConfigEvent::SceneDeviceUnmatched {
                            scene: scene_id.clone(),
                            device: virtual_id.clone(),
                        });
                        continue;
                    }
                    if let Some(effect) = self.migrate_scene_effect(scene_id, effect) {
                        entries.insert(virtual_id.clone(), effect);
                    }
                }
            }

            let name = scene
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(scene_id)
                .to_string();
            let extra = scene
                .iter()
                .filter(|(k, _)| !matches!(k.as_str(), "name" | "virtuals" | "devices"))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            out.insert(
                scene_id.clone(),
                Scene {
                    name,
                    virtuals: entries,
                    extra,
                },
            );
        }
        out
    }

    fn migrate_scene_effect(&self, scene_id: &str, effect: &Value) -> Option<SceneEffect> {
        let old_type = effect.get("type").and_then(Value::as_str).unwrap_or_default();
        let Some(effect_type) = self.match_effect_id(old_type) else {
            self.observer.notify(ConfigEvent::EffectUnmatched {
                effect: old_type.to_string(),
                context: format!("scene {scene_id}"),
            });
            return None;
        };
        let config = effect
            .get("config")
            .and_then(Value::as_object)
            .map(|c| self.sanitize_effect_config(&effect_type, c))
            .unwrap_or_default();
        Some(SceneEffect {
            effect_type,
            config,
        })
    }

    fn skip_device(&self, device: String, reason: String) {
        self.observer
            .notify(ConfigEvent::DeviceSkipped { device, reason });
    }

    fn discard_field(&self, effect: &str, field: &str, reason: String) {
        self.observer.notify(ConfigEvent::ConfigFieldDiscarded {
            effect: effect.to_string(),
            field: field.to_string(),
            reason,
        });
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ConfigError> {
    serde_json::to_value(value).map_err(ConfigError::Serialize)
}

/// `audio.audio_device` is set to something other than null or empty.
fn has_audio_device(old: &Document) -> bool {
    match old.get("audio").and_then(|a| a.get("audio_device")) {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

fn check_device(entry: &Value) -> Result<(), String> {
    if !entry.is_object() {
        return Err(format!("expected an object, found {}", json_type_name(entry)));
    }
    for (pointer, what) in [("/id", "id"), ("/type", "type"), ("/config/name", "config.name")] {
        if entry.pointer(pointer).and_then(Value::as_str).is_none() {
            return Err(format!("missing string {what}"));
        }
    }
    Ok(())
}

fn base_virtual_id(name: &str, device_id: &str) -> String {
    [slugify(name), slugify(device_id)]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "virtual".to_string())
}

fn unique_id(base: &str, taken: &mut HashSet<String>) -> String {
    let mut id = base.to_string();
    let mut n = 2;
    while !taken.insert(id.clone()) {
        id = format!("{base}-{n}");
        n += 1;
    }
    id
}

fn virtual_id_of(virtual_entry: &Value) -> Option<&str> {
    virtual_entry.get("id").and_then(Value::as_str)
}

/// The virtual generated for `device`, or failing that one whose id is the
/// device id.
fn virtual_for_device<'v>(virtuals: &'v [Value], device: &str) -> Option<&'v str> {
    virtuals
        .iter()
        .find(|v| v.get("is_device").and_then(Value::as_str) == Some(device))
        .or_else(|| virtuals.iter().find(|v| virtual_id_of(v) == Some(device)))
        .and_then(virtual_id_of)
}
