//! JSON manifests (package.json, tauri.conf.json)
//!
//! Rewrites keep key order (serde_json `preserve_order`), use two-space
//! indentation, leave non-ASCII text unescaped, and keep the file's trailing
//! newline if it had one.

use super::{SyncOutcome, read_text};
use crate::core::error::{ManifestError, ResultExt, ShipResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const VERSION_KEY: &str = "version";

/// Read and parse a JSON manifest whose root must be an object
pub(crate) fn load(path: &Path) -> Result<(Map<String, Value>, String), ManifestError> {
  let content = read_text(path)?;
  let value: Value = serde_json::from_str(&content).map_err(|e| ManifestError::Malformed {
    path: path.to_path_buf(),
    reason: e.to_string(),
  })?;

  match value {
    Value::Object(map) => Ok((map, content)),
    _ => Err(ManifestError::Malformed {
      path: path.to_path_buf(),
      reason: "expected a JSON object at the top level".to_string(),
    }),
  }
}

/// Read the top-level `"version"` string
pub fn read_version(path: &Path) -> Result<String, ManifestError> {
  let (map, _) = load(path)?;
  map
    .get(VERSION_KEY)
    .and_then(Value::as_str)
    .map(str::to_string)
    .ok_or_else(|| ManifestError::VersionMissing {
      path: path.to_path_buf(),
    })
}

/// Set the top-level `"version"`, rewriting the file only if it changes
///
/// A missing key is inserted at the end of the object.
pub fn write_version(path: &Path, version: &str) -> ShipResult<SyncOutcome> {
  let (mut map, original) = match load(path) {
    Ok(loaded) => loaded,
    Err(ManifestError::Missing { .. }) => return Ok(SyncOutcome::Missing),
    Err(e) => return Err(e.into()),
  };

  let previous = map.get(VERSION_KEY).and_then(Value::as_str).map(str::to_string);
  if previous.as_deref() == Some(version) {
    return Ok(SyncOutcome::Unchanged);
  }

  map.insert(VERSION_KEY.to_string(), Value::String(version.to_string()));

  let mut rendered = serde_json::to_string_pretty(&Value::Object(map))?;
  if original.ends_with('\n') {
    rendered.push('\n');
  }
  fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;

  Ok(SyncOutcome::Updated {
    from: previous,
    to: version.to_string(),
  })
}
