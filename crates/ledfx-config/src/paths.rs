//! Locations of configuration files.
//!
//! All files live in a single configuration directory, supplied by the host
//! or resolved with [`default_config_dir`].
//!
//! # Directory Layout
//!
//! ```text
//! <config dir>/
//!     config.json                        main configuration document
//!     presets.json                       user presets
//!     config_backup_<DD-MM-YY_HH-MM-SS>.json
//!     LedFx.log
//!     ssl/fullchain.pem
//!     ssl/privkey.pem
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Name of the configuration directory inside the platform base directory.
pub const CONFIG_DIRECTORY: &str = ".ledfx";

/// File name of the main configuration document.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// File name of the user presets document.
pub const PRESETS_FILE_NAME: &str = "presets.json";

const LOG_FILE_NAME: &str = "LedFx.log";
const SSL_SUBDIR: &str = "ssl";
const PRIVATE_KEY_FILE: &str = "privkey.pem";
const CHAIN_KEY_FILE: &str = "fullchain.pem";

/// Returns the default configuration directory.
///
/// # Platform Paths
///
/// - Windows: `%APPDATA%\.ledfx\`
/// - Everything else: `~/.ledfx/`
///
/// Returns a path relative to the working directory if the base directory
/// cannot be determined.
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let base = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(dirs::config_dir);
    #[cfg(not(target_os = "windows"))]
    let base = dirs::home_dir();

    base.unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIRECTORY)
}

/// Path of `config.json` in `config_dir`.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Path of `presets.json` in `config_dir`.
pub fn presets_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(PRESETS_FILE_NAME)
}

/// Path of the application log file in `config_dir`.
pub fn log_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(LOG_FILE_NAME)
}

/// Certificate chain and private key in `<config_dir>/ssl`, if both exist.
///
/// Returns `(chain, key)`.
pub fn ssl_cert_paths(config_dir: &Path) -> Option<(PathBuf, PathBuf)> {
    let ssl_dir = config_dir.join(SSL_SUBDIR);
    let chain = ssl_dir.join(CHAIN_KEY_FILE);
    let key = ssl_dir.join(PRIVATE_KEY_FILE);

    (chain.is_file() && key.is_file()).then_some((chain, key))
}

/// Ensure the configuration directory exists.
///
/// Only the default directory is created on demand. An explicitly supplied
/// directory that does not exist is an error.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidConfigDir`] for a missing non-default
/// directory, or [`ConfigError::CreateDir`] if creation fails.
pub fn ensure_config_dir(config_dir: &Path) -> Result<(), ConfigError> {
    if config_dir.is_dir() {
        return Ok(());
    }

    if config_dir != default_config_dir() {
        return Err(ConfigError::InvalidConfigDir(config_dir.to_path_buf()));
    }

    std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::create_dir(config_dir, e))
}
