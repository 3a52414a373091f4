//! Read-only diagnosis of a config file.
//!
//! Runs the same checks as loading, without creating backups or writing
//! anything, and reports which recovery path loading would take.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use ledfx_config::paths::config_file_path;
use ledfx_config::{ConfigDocument, check_version, core_config_schema};
use serde_json::Value;

#[derive(Args)]
pub struct CheckArgs {
    /// Check this file instead of config.json in the config directory
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

/// What loading the file would do.
enum Status {
    Current(ConfigDocument),
    Missing,
    Unreadable(String),
    Corrupt(String),
    Stale(String),
    Invalid(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Current(doc) => write!(
                f,
                "ok ({} devices, {} virtuals, {} preset groups, {} scenes)",
                doc.devices().len(),
                doc.virtuals().len(),
                doc.user_presets().len(),
                doc.scenes().len()
            ),
            Status::Missing => f.write_str("missing, defaults will be written"),
            Status::Unreadable(e) => write!(f, "unreadable, defaults will be used: {e}"),
            Status::Corrupt(e) => write!(f, "not valid JSON, will be backed up and reset: {e}"),
            Status::Stale(e) => write!(f, "will be backed up and migrated: {e}"),
            Status::Invalid(e) => write!(f, "invalid, will be backed up and repaired: {e}"),
        }
    }
}

fn diagnose(path: &Path) -> Status {
    if !path.exists() {
        return Status::Missing;
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return Status::Unreadable(e.to_string()),
    };
    let raw: Value = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => return Status::Corrupt(e.to_string()),
    };
    let Value::Object(map) = raw else {
        return Status::Stale("top level is not an object".to_string());
    };
    if let Err(e) = check_version(&map) {
        return Status::Stale(e.to_string());
    }
    match core_config_schema().normalize(&map) {
        Ok(doc) => Status::Current(ConfigDocument::new(doc)),
        Err(e) => Status::Invalid(e.to_string()),
    }
}

pub fn run(config_dir: &Path, args: CheckArgs) -> anyhow::Result<()> {
    let path = args.file.unwrap_or_else(|| config_file_path(config_dir));
    let status = diagnose(&path);
    println!("{}: {status}", path.display());

    match status {
        Status::Current(_) | Status::Missing => Ok(()),
        _ => anyhow::bail!("{} needs recovery", path.display()),
    }
}
