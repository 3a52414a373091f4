//! Configuration loading, migration and persistence for LedFx.
//!
//! This crate owns the persisted configuration document: it loads
//! `config.json`, validates it against the core schema, migrates documents
//! written by older versions, and writes the document and user presets back.
//!
//! # Features
//!
//! - **Never-failing load**: unreadable, corrupt or stale files are backed up
//!   and recovered from, so the host always gets a schema-complete document
//! - **Migration**: legacy devices, presets and scenes are rewritten into the
//!   current entity model, dropping only the entries that cannot be kept
//! - **Deterministic output**: sorted keys and fixed indentation
//! - **Observer**: every decision is reported as a [`ConfigEvent`]
//!
//! # Example
//!
//! ```rust,no_run
//! use ledfx_config::{ConfigLoader, TracingObserver, default_config_dir, save_config};
//! use ledfx_registry::StaticRegistry;
//!
//! let registry = StaticRegistry::new();
//! let observer = TracingObserver;
//! let dir = default_config_dir();
//!
//! let mut config = ConfigLoader::new(&dir, &registry, &observer).load();
//! config.insert("port", 9000);
//! save_config(&mut config, &dir, &observer).unwrap();
//! ```

mod error;
mod loader;
mod observer;
mod version;

/// Backups of unusable config files.
pub mod backup;

/// The configuration document and its entity views.
pub mod document;

/// Migration of old documents.
pub mod migration;

/// Config file locations.
pub mod paths;

/// The core configuration schema.
pub mod schema;

/// Writing documents to disk.
pub mod writer;

use std::path::Path;

use ledfx_registry::EffectRegistry;

pub use backup::{BackupReason, create_backup};
pub use document::{
    ConfigDocument, Device, DeviceConfig, Preset, Scene, SceneEffect, Segment, UserPresets,
    Virtual, VirtualConfig, WledSetting,
};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use migration::Migrator;
pub use observer::{ConfigEvent, ConfigObserver, NullObserver, RecordingObserver, TracingObserver};
pub use paths::{default_config_dir, ensure_config_dir, log_file_path, ssl_cert_paths};
pub use schema::{CONFIGURATION_VERSION, core_config_schema, default_document};
pub use version::{check_version, parse_version, versions_match};
pub use writer::{save_config, save_presets};

/// Re-export the schema model used by the core schema and effect registries
pub use ledfx_schema::{Document, Schema, ValidationError};

/// Load the configuration in `config_dir`. See [`ConfigLoader::load`].
pub fn load_config(
    config_dir: &Path,
    registry: &dyn EffectRegistry,
    observer: &dyn ConfigObserver,
) -> ConfigDocument {
    ConfigLoader::new(config_dir, registry, observer).load()
}
