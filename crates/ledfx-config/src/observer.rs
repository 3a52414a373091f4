//! Observation of load, migration and save progress.
//!
//! Components never log on their own. They report [`ConfigEvent`]s to a
//! [`ConfigObserver`] supplied by the host, which is created once at
//! startup and passed by reference to every call.
//!
//! # Example
//!
//! ```rust
//! use ledfx_config::{ConfigEvent, ConfigObserver, RecordingObserver};
//!
//! let observer = RecordingObserver::new();
//! observer.notify(ConfigEvent::MigrationStarted);
//! assert_eq!(observer.events().len(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

use crate::backup::BackupReason;

/// Something that happened while loading, migrating or saving.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    /// Reading the config file.
    Loading {
        /// Config file path.
        path: PathBuf,
    },
    /// Version found in the document.
    VersionDetected {
        /// Raw `configuration_version`, if present.
        version: Option<String>,
    },
    /// The config file could not be used as-is.
    LoadFailed {
        /// Failure class.
        reason: BackupReason,
        /// Error text.
        error: String,
    },
    /// The config file was moved aside.
    BackupCreated {
        /// Failure class that triggered the backup.
        reason: BackupReason,
        /// Backup file path.
        path: PathBuf,
    },
    /// The config file could not be moved aside.
    BackupFailed {
        /// Failure class that triggered the backup.
        reason: BackupReason,
        /// Error text.
        error: String,
    },
    /// The config file was copied aside but the original could not be removed.
    BackupSourceKept {
        /// Config file path.
        path: PathBuf,
        /// Removal error text.
        error: String,
    },
    /// Migration of an old document started.
    MigrationStarted,
    /// A device was left out of the migrated document.
    DeviceSkipped {
        /// Device id, or its index if it has none.
        device: String,
        /// Why it was skipped.
        reason: String,
    },
    /// A virtual was generated for a device.
    VirtualCreated {
        /// New virtual id.
        id: String,
        /// Backing device id.
        device: String,
    },
    /// A device got no generated virtual.
    VirtualSkipped {
        /// Device id.
        device: String,
        /// Why no virtual was generated.
        reason: String,
    },
    /// An effect id matched nothing in the registry.
    EffectUnmatched {
        /// Effect id as found in the old document.
        effect: String,
        /// Where it was referenced.
        context: String,
    },
    /// A preset was dropped.
    PresetDiscarded {
        /// Effect id.
        effect: String,
        /// Preset id.
        preset: String,
        /// Why it was dropped.
        reason: String,
    },
    /// A single effect config field was dropped.
    ConfigFieldDiscarded {
        /// Effect id.
        effect: String,
        /// Field name.
        field: String,
        /// Why it was dropped.
        reason: String,
    },
    /// A scene entry referenced a device with no matching virtual.
    SceneDeviceUnmatched {
        /// Scene id.
        scene: String,
        /// Device id.
        device: String,
    },
    /// A whole scene was dropped.
    SceneDiscarded {
        /// Scene id.
        scene: String,
        /// Why it was dropped.
        reason: String,
    },
    /// Migration completed.
    MigrationFinished,
    /// Migration failed as a whole.
    MigrationFailed {
        /// Error text.
        error: String,
    },
    /// A top-level field failed validation and was reset to its default.
    FieldReset {
        /// Field name.
        field: String,
        /// Validation error text.
        reason: String,
    },
    /// The loader gave up and returned schema defaults.
    RecoveredWithDefaults {
        /// Why.
        reason: String,
    },
    /// `presets.json` exists but could not be used.
    PresetsFileUnreadable {
        /// Presets file path.
        path: PathBuf,
        /// Error text.
        error: String,
    },
    /// Writing a file.
    Saving {
        /// Target path.
        path: PathBuf,
    },
}

impl ConfigEvent {
    /// Whether the event reports lost or discarded data.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            ConfigEvent::Loading { .. }
                | ConfigEvent::VersionDetected { .. }
                | ConfigEvent::MigrationStarted
                | ConfigEvent::VirtualCreated { .. }
                | ConfigEvent::MigrationFinished
                | ConfigEvent::Saving { .. }
        )
    }
}

impl fmt::Display for ConfigEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigEvent::Loading { path } => write!(f, "loading {}", path.display()),
            ConfigEvent::VersionDetected { version } => write!(
                f,
                "configuration version {}",
                version.as_deref().unwrap_or("<missing>")
            ),
            ConfigEvent::LoadFailed { reason, error } => write!(f, "{reason}: {error}"),
            ConfigEvent::BackupCreated { reason, path } => {
                write!(f, "{reason}. Backup saved to {}", path.display())
            }
            ConfigEvent::BackupFailed { reason, error } => {
                write!(f, "{reason}. Backup failed: {error}")
            }
            ConfigEvent::BackupSourceKept { path, error } => {
                write!(f, "backup copied but {} was not removed: {error}", path.display())
            }
            ConfigEvent::MigrationStarted => f.write_str("migrating configuration"),
            ConfigEvent::DeviceSkipped { device, reason } => {
                write!(f, "skipping device {device}: {reason}")
            }
            ConfigEvent::VirtualCreated { id, device } => {
                write!(f, "created virtual {id} for device {device}")
            }
            ConfigEvent::VirtualSkipped { device, reason } => {
                write!(f, "no virtual for device {device}: {reason}")
            }
            ConfigEvent::EffectUnmatched { effect, context } => {
                write!(f, "unknown effect {effect:?} in {context}")
            }
            ConfigEvent::PresetDiscarded {
                effect,
                preset,
                reason,
            } => write!(f, "dropping preset {effect}/{preset}: {reason}"),
            ConfigEvent::ConfigFieldDiscarded {
                effect,
                field,
                reason,
            } => write!(f, "dropping {effect} field {field}: {reason}"),
            ConfigEvent::SceneDeviceUnmatched { scene, device } => {
                write!(f, "scene {scene}: no virtual for device {device}")
            }
            ConfigEvent::SceneDiscarded { scene, reason } => {
                write!(f, "dropping scene {scene}: {reason}")
            }
            ConfigEvent::MigrationFinished => f.write_str("migration finished"),
            ConfigEvent::MigrationFailed { error } => write!(f, "migration failed: {error}"),
            ConfigEvent::FieldReset { field, reason } => {
                write!(f, "resetting {field} to default: {reason}")
            }
            ConfigEvent::RecoveredWithDefaults { reason } => {
                write!(f, "using default configuration: {reason}")
            }
            ConfigEvent::PresetsFileUnreadable { path, error } => {
                write!(f, "ignoring {}: {error}", path.display())
            }
            ConfigEvent::Saving { path } => write!(f, "saving {}", path.display()),
        }
    }
}

/// Receiver of [`ConfigEvent`]s.
pub trait ConfigObserver {
    /// Handle one event.
    fn notify(&self, event: ConfigEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ConfigObserver for TracingObserver {
    fn notify(&self, event: ConfigEvent) {
        match &event {
            ConfigEvent::Loading { path } | ConfigEvent::Saving { path } => {
                tracing::debug!(path = %path.display(), "{event}");
            }
            ConfigEvent::VersionDetected { version } => {
                tracing::debug!(version = version.as_deref().unwrap_or("<missing>"), "{event}");
            }
            ConfigEvent::LoadFailed { reason, error } => {
                tracing::warn!(%reason, %error, "config file unusable");
            }
            ConfigEvent::BackupCreated { reason, path } => {
                tracing::warn!(%reason, backup = %path.display(), "{event}");
            }
            ConfigEvent::BackupFailed { reason, error } => {
                tracing::error!(%reason, %error, "config backup failed");
            }
            ConfigEvent::MigrationStarted | ConfigEvent::MigrationFinished => {
                tracing::info!("{event}");
            }
            ConfigEvent::VirtualCreated { id, device } => {
                tracing::info!(virtual_id = %id, device = %device, "created virtual");
            }
            ConfigEvent::MigrationFailed { error } => {
                tracing::error!(%error, "config migration failed");
            }
            ConfigEvent::RecoveredWithDefaults { reason } => {
                tracing::error!(%reason, "using default configuration");
            }
            _ => tracing::warn!("{event}"),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<ConfigEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far, in order.
    pub fn events(&self) -> Vec<ConfigEvent> {
        self.events.borrow().clone()
    }

    /// Events for which [`ConfigEvent::is_warning`] holds.
    pub fn warnings(&self) -> Vec<ConfigEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }

    /// Whether any recorded event satisfies `predicate`.
    pub fn any(&self, predicate: impl Fn(&ConfigEvent) -> bool) -> bool {
        self.events.borrow().iter().any(predicate)
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ConfigObserver for RecordingObserver {
    fn notify(&self, event: ConfigEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ConfigObserver for NullObserver {
    fn notify(&self, _event: ConfigEvent) {}
}
