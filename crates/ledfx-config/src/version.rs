//! Configuration version detection.
//!
//! Versions are compared as semantic versions. Two-part versions (`"2.0"`)
//! are read as `"2.0.0"`. Two versions match when they have equal
//! precedence: pre-release tags are significant, build metadata is ignored.
//! Anything that does not parse never matches.

use std::cmp::Ordering;

use ledfx_schema::Document;
use semver::Version;
use serde_json::Value;

use crate::error::ConfigError;
use crate::schema::{CONFIGURATION_VERSION, VERSION_KEY};

/// Parse a configuration version string.
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    if let Ok(v) = Version::parse(version) {
        return Some(v);
    }

    // Pad "MAJOR.MINOR" (with optional suffix) to "MAJOR.MINOR.0".
    let split = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(split);
    if core.split('.').count() != 2 {
        return None;
    }
    Version::parse(&format!("{core}.0{suffix}")).ok()
}

/// Whether `found` denotes the same version as `expected`.
pub fn versions_match(found: &str, expected: &str) -> bool {
    match (parse_version(found), parse_version(expected)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b) == Ordering::Equal,
        _ => false,
    }
}

/// The raw `configuration_version` of a document, for logging.
pub fn document_version(document: &Value) -> Option<String> {
    document.get(VERSION_KEY).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Check that `document` carries the current configuration version.
///
/// # Errors
///
/// Returns [`ConfigError::VersionMismatch`] if the key is missing, is not a
/// string, or names a different version.
pub fn check_version(document: &Document) -> Result<(), ConfigError> {
    let found = document.get(VERSION_KEY);
    match found.and_then(Value::as_str) {
        Some(v) if versions_match(v, CONFIGURATION_VERSION) => Ok(()),
        _ => Err(ConfigError::VersionMismatch {
            found: found.map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            expected: CONFIGURATION_VERSION.to_string(),
        }),
    }
}
