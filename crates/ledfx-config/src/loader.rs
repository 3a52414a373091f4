//! Loading the configuration document.
//!
//! [`ConfigLoader::load`] always produces a usable, schema-normalized
//! document. Problems with the file on disk are recovered from, never
//! returned:
//!
//! | Failure | Backup | Recovery |
//! |---|---|---|
//! | File unreadable | yes (`Io`) | schema defaults |
//! | Not JSON | yes (`Decode`) | migrate `{}` |
//! | Version missing or stale, or invalid content | yes (`Version`) | migrate the document |
//!
//! A migrated document that still fails validation has each invalid
//! top-level field reset to its default. If that is not enough either, the
//! schema defaults are used.

use std::fs;
use std::path::{Path, PathBuf};

use ledfx_registry::EffectRegistry;
use ledfx_schema::Document;
use serde_json::{Map, Value};

use crate::backup::{BackupReason, create_backup};
use crate::document::ConfigDocument;
use crate::error::ConfigError;
use crate::migration::Migrator;
use crate::observer::{ConfigEvent, ConfigObserver};
use crate::paths::{config_file_path, ensure_config_dir, presets_file_path};
use crate::schema::core_config_schema;
use crate::version::{check_version, document_version};
use crate::writer::save_config;

/// Loads `config.json` from one configuration directory.
pub struct ConfigLoader<'a> {
    config_dir: PathBuf,
    registry: &'a dyn EffectRegistry,
    observer: &'a dyn ConfigObserver,
}

impl<'a> ConfigLoader<'a> {
    /// Create a loader for `config_dir`.
    pub fn new(
        config_dir: impl Into<PathBuf>,
        registry: &'a dyn EffectRegistry,
        observer: &'a dyn ConfigObserver,
    ) -> Self {
        Self {
            config_dir: config_dir.into(),
            registry,
            observer,
        }
    }

    /// The configuration directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of `config.json`.
    pub fn config_path(&self) -> PathBuf {
        config_file_path(&self.config_dir)
    }

    /// Load, validate and if needed migrate the configuration.
    pub fn load(&self) -> ConfigDocument {
        let path = match self.ensure_config_file() {
            Ok(path) => path,
            Err(e) => {
                self.observer.notify(ConfigEvent::RecoveredWithDefaults {
                    reason: e.to_string(),
                });
                return ConfigDocument::defaults();
            }
        };
        self.observer.notify(ConfigEvent::Loading { path: path.clone() });

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                let error = ConfigError::read_file(&path, e);
                self.fail(BackupReason::Io, &error);
                self.observer.notify(ConfigEvent::RecoveredWithDefaults {
                    reason: error.to_string(),
                });
                return ConfigDocument::defaults();
            }
        };

        let raw: Value = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(e) => {
                self.fail(BackupReason::Decode, &ConfigError::Decode(e));
                return self.recover(&Value::Object(Map::new()));
            }
        };
        self.observer.notify(ConfigEvent::VersionDetected {
            version: document_version(&raw),
        });

        let current = match &raw {
            Value::Object(map) => check_version(map)
                .and_then(|()| core_config_schema().normalize(map).map_err(ConfigError::from)),
            other => Err(ConfigError::Migration(format!(
                "expected a JSON object, found {}",
                ledfx_schema::json_type_name(other)
            ))),
        };
        match current {
            Ok(doc) => ConfigDocument::new(doc),
            Err(error) => {
                self.fail(BackupReason::Version, &error);
                self.recover(&raw)
            }
        }
    }

    /// Make sure `config.json` exists, writing schema defaults if it does
    /// not.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is unusable or the default file
    /// cannot be written.
    pub fn ensure_config_file(&self) -> Result<PathBuf, ConfigError> {
        ensure_config_dir(&self.config_dir)?;
        let path = self.config_path();
        if !path.exists() {
            save_config(&mut ConfigDocument::defaults(), &self.config_dir, self.observer)?;
        }
        Ok(path)
    }

    /// Migrate `raw` and validate the result.
    pub fn recover(&self, raw: &Value) -> ConfigDocument {
        let migrated = match Migrator::new(self.registry, self.observer).migrate(raw) {
            Ok(doc) => doc,
            Err(e) => {
                self.observer.notify(ConfigEvent::MigrationFailed {
                    error: e.to_string(),
                });
                Document::new()
            }
        };
        self.validate_or_reset(migrated)
    }

    /// `user_presets` from `presets.json`, if the file exists and is usable.
    pub fn load_presets(&self) -> Option<Map<String, Value>> {
        let path = presets_file_path(&self.config_dir);
        if !path.is_file() {
            return None;
        }

        let parsed = fs::read_to_string(&path)
            .map_err(|e| ConfigError::read_file(&path, e))
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(ConfigError::from));
        let error = match parsed {
            Ok(Value::Object(mut map)) => match map.remove("user_presets") {
                Some(Value::Object(presets)) => return Some(presets),
                _ => "no user_presets object".to_string(),
            },
            Ok(_) => "expected a JSON object".to_string(),
            Err(e) => e.to_string(),
        };
        self.observer
            .notify(ConfigEvent::PresetsFileUnreadable { path, error });
        None
    }

    fn fail(&self, reason: BackupReason, error: &ConfigError) {
        self.observer.notify(ConfigEvent::LoadFailed {
            reason,
            error: error.to_string(),
        });
        // Reported to the observer by create_backup; recovery goes on.
        let _ = create_backup(&self.config_dir, &self.config_path(), reason, self.observer);
    }

    fn validate_or_reset(&self, mut doc: Document) -> ConfigDocument {
        let schema = core_config_schema();
        if let Ok(valid) = schema.normalize(&doc) {
            return ConfigDocument::new(valid);
        }

        for field in schema.field_names() {
            if let Some(value) = doc.get(field)
                && let Err(e) = schema.validate_field(field, value)
            {
                self.observer.notify(ConfigEvent::FieldReset {
                    field: field.to_string(),
                    reason: e.to_string(),
                });
                doc.remove(field);
            }
        }

        match schema.normalize(&doc) {
            Ok(valid) => ConfigDocument::new(valid),
            Err(e) => {
                self.observer.notify(ConfigEvent::RecoveredWithDefaults {
                    reason: e.to_string(),
                });
                ConfigDocument::defaults()
            }
        }
    }
}
