//! Backups of config files that could not be used.
//!
//! A backup moves the offending file to
//! `config_backup_<DD-MM-YY_HH-MM-SS>.json` next to it, so the next save
//! starts from a vacated path. Backups are never modified afterwards.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::ConfigError;
use crate::observer::{ConfigEvent, ConfigObserver};

const BACKUP_PREFIX: &str = "config_backup_";
const TIMESTAMP_FORMAT: &str = "%d-%m-%y_%H-%M-%S";

/// Why a config file is being backed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupReason {
    /// The file is not valid JSON.
    Decode,
    /// The document's version is missing or not current.
    Version,
    /// The file could not be read.
    Io,
}

impl BackupReason {
    /// Human-readable description of the failure.
    pub fn message(self) -> &'static str {
        match self {
            BackupReason::Decode => {
                "Error loading configuration, empty configuration used"
            }
            BackupReason::Version => "Incompatible configuration detected",
            BackupReason::Io => "Unable to open configuration, empty configuration used",
        }
    }
}

impl fmt::Display for BackupReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Move `config_file` aside into a timestamped backup in `config_dir`.
///
/// The file is renamed when possible. Otherwise it is copied with its
/// modification time carried over, then the original is removed. If that
/// removal fails the backup still stands and
/// [`ConfigEvent::BackupSourceKept`] is reported.
///
/// # Errors
///
/// Returns [`ConfigError::Backup`] if neither rename nor copy succeeds.
/// The failure is also reported to `observer`.
pub fn create_backup(
    config_dir: &Path,
    config_file: &Path,
    reason: BackupReason,
    observer: &dyn ConfigObserver,
) -> Result<PathBuf, ConfigError> {
    let backup = backup_path(config_dir);

    match move_file(config_file, &backup, observer) {
        Ok(()) => {
            observer.notify(ConfigEvent::BackupCreated {
                reason,
                path: backup.clone(),
            });
            Ok(backup)
        }
        Err(source) => {
            observer.notify(ConfigEvent::BackupFailed {
                reason,
                error: source.to_string(),
            });
            Err(ConfigError::backup(config_file, backup, source))
        }
    }
}

/// Whether `path` names a backup file.
pub fn is_backup_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(".json"))
}

/// Backups in `config_dir`, oldest name first.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFile`] if the directory cannot be listed.
pub fn list_backups(config_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = fs::read_dir(config_dir).map_err(|e| ConfigError::read_file(config_dir, e))?;
    let mut backups: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_backup_file(path))
        .collect();
    backups.sort();
    Ok(backups)
}

fn backup_path(config_dir: &Path) -> PathBuf {
    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let first = config_dir.join(format!("{BACKUP_PREFIX}{stamp}.json"));
    if !first.exists() {
        return first;
    }

    (1..)
        .map(|n| config_dir.join(format!("{BACKUP_PREFIX}{stamp}_{n}.json")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn move_file(from: &Path, to: &Path, observer: &dyn ConfigObserver) -> io::Result<()> {
    finish_move(fs::rename(from, to), from, to, observer)
}

/// Fall back to copy and remove when `renamed` failed.
///
/// A copy whose original cannot be removed still counts as a backup; the
/// removal error goes to `observer` as [`ConfigEvent::BackupSourceKept`].
fn finish_move(
    renamed: io::Result<()>,
    from: &Path,
    to: &Path,
    observer: &dyn ConfigObserver,
) -> io::Result<()> {
    if renamed.is_ok() {
        return Ok(());
    }

    fs::copy(from, to)?;
    if let Ok(modified) = fs::metadata(from).and_then(|m| m.modified())
        && let Ok(file) = fs::File::options().write(true).open(to)
    {
        let _ = file.set_modified(modified);
    }
    if let Err(e) = fs::remove_file(from) {
        observer.notify(ConfigEvent::BackupSourceKept {
            path: from.to_path_buf(),
            error: e.to_string(),
        });
    }
    Ok(())
}
