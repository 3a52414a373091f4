//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Failed to serialize JSON
    #[error("failed to serialize JSON: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The document's `configuration_version` is missing or not current
    #[error("configuration version {} does not match {expected}", .found.as_deref().unwrap_or("<missing>"))]
    VersionMismatch {
        /// Version found in the document, if any.
        found: Option<String>,
        /// Version this build expects.
        expected: String,
    },

    /// An old document could not be migrated
    #[error("migration failed: {0}")]
    Migration(String),

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] ledfx_schema::ValidationError),

    /// Failed to back up a file
    #[error("failed to back up '{path}' to '{backup}': {source}")]
    Backup {
        /// File that was being backed up.
        path: PathBuf,
        /// Intended backup location.
        backup: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An explicitly supplied configuration directory does not exist
    #[error("invalid configuration directory '{0}'")]
    InvalidConfigDir(PathBuf),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a backup error.
    pub fn backup(
        path: impl Into<PathBuf>,
        backup: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        ConfigError::Backup {
            path: path.into(),
            backup: backup.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    // --- factory methods ---

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/some/config.json", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/config.json"))
        );
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = ConfigError::write_file("/out/config.json", mock_io_err());
        assert!(
            matches!(err, ConfigError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/config.json"))
        );
    }

    #[test]
    fn backup_factory_produces_correct_variant() {
        let err = ConfigError::backup("/a/config.json", "/a/config_backup.json", mock_io_err());
        assert!(matches!(
            err,
            ConfigError::Backup { ref backup, .. } if backup == std::path::Path::new("/a/config_backup.json")
        ));
    }

    // --- Display formatting ---

    #[test]
    fn read_file_display() {
        let err = ConfigError::read_file("/a/config.json", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/config.json"), "got: {msg}");
    }

    #[test]
    fn create_dir_display() {
        let err = ConfigError::create_dir("/a/b", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to create directory"), "got: {msg}");
        assert!(msg.contains("/a/b"), "got: {msg}");
    }

    #[test]
    fn version_mismatch_display() {
        let err = ConfigError::VersionMismatch {
            found: Some("0.9.0".to_string()),
            expected: "2.0.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "configuration version 0.9.0 does not match 2.0.0"
        );

        let err = ConfigError::VersionMismatch {
            found: None,
            expected: "2.0.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "configuration version <missing> does not match 2.0.0"
        );
    }

    #[test]
    fn decode_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(err.to_string().starts_with("failed to parse JSON"));
    }

    // --- Error::source() chain for I/O-wrapping variants ---

    #[test]
    fn read_file_source_is_some() {
        let err = ConfigError::read_file("/x", mock_io_err());
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn backup_source_is_some() {
        let err = ConfigError::backup("/x", "/y", mock_io_err());
        assert!(err.source().is_some(), "Backup must expose I/O source");
    }

    #[test]
    fn migration_source_is_none() {
        let err = ConfigError::Migration("bad".to_string());
        assert!(err.source().is_none());
    }
}
