//! Plugin metadata patching.
//!
//! A repackaged plugin is re-signed under a fixed author, so the manifest
//! and the marketplace verification record are rewritten in place before
//! the bundle is packaged again. Everything else in both files is
//! preserved untouched, which is why they are edited as loose values
//! rather than typed documents.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use serde_yaml::Value as YamlValue;

use super::error::RepackResult;

/// Author stamped into repackaged plugins.
pub const REPACK_AUTHOR: &str = "xcsf";

/// Plugin manifest file name.
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Marketplace verification record file name.
pub const VERIFICATION_FILE: &str = ".verification.dify.json";

/// Rewrite `manifest.yaml` in `dir`: replace `author` and normalize
/// `created_at`. A missing manifest is not an error.
pub fn patch_manifest(dir: &Path) -> RepackResult<()> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    let mut manifest: YamlValue = serde_yaml::from_str(&content)?;

    if let Some(map) = manifest.as_mapping_mut() {
        map.insert("author".into(), YamlValue::String(REPACK_AUTHOR.to_string()));

        if let Some(created_at) = map.get("created_at").cloned() {
            tracing::debug!(created_at = ?created_at, "normalizing manifest timestamp");
            let normalized = normalize_created_at(&created_at);
            map.insert("created_at".into(), YamlValue::String(normalized));
        }
    }

    std::fs::write(&path, serde_yaml::to_string(&manifest)?)?;
    Ok(())
}

/// Rewrite `.verification.dify.json` in `dir`: replace
/// `authorized_category`. A missing record is not an error.
pub fn patch_verification(dir: &Path) -> RepackResult<()> {
    let path = dir.join(VERIFICATION_FILE);
    if !path.exists() {
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    let mut record: serde_json::Value = serde_json::from_str(&content)?;

    if let Some(map) = record.as_object_mut() {
        map.insert(
            "authorized_category".to_string(),
            serde_json::Value::String(REPACK_AUTHOR.to_string()),
        );
    }

    std::fs::write(&path, serde_json::to_string(&record)?)?;
    Ok(())
}

/// Normalize a manifest `created_at` value to a string.
///
/// String values go through [`normalize_datetime_str`]; any other scalar
/// is rendered to its direct string form unchanged.
pub fn normalize_created_at(value: &YamlValue) -> String {
    match value {
        YamlValue::String(s) => normalize_datetime_str(s),
        other => scalar_to_string(other),
    }
}

/// Best-effort normalization of a timestamp string to combined
/// date-and-time form with a literal `T` separator.
///
/// - Already contains `T`: returned unchanged.
/// - Contains a space: split on the first space only, joined with `T`;
///   the candidate is returned if it parses as a date-time (with or
///   without a UTC offset), otherwise the input is returned unchanged.
/// - Anything else is returned unchanged. Never fails.
pub fn normalize_datetime_str(input: &str) -> String {
    if input.contains('T') {
        return input.to_string();
    }

    if let Some((date, time)) = input.split_once(' ') {
        let candidate = format!("{date}T{time}");
        if parses_as_datetime(&candidate) {
            return candidate;
        }
    }

    input.to_string()
}

/// Canonical combined form for an already-parsed timestamp.
///
/// Fractional seconds are emitted only when non-zero, so the output
/// always round-trips through [`normalize_datetime_str`] unchanged.
pub fn canonical_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn parses_as_datetime(s: &str) -> bool {
    // Offset-carrying timestamps ("+08:00", "Z") parse as RFC 3339,
    // naive ones through chrono's ISO 8601 FromStr.
    DateTime::parse_from_rfc3339(s).is_ok() || s.parse::<NaiveDateTime>().is_ok()
}

fn scalar_to_string(value: &YamlValue) -> String {
    match value {
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
