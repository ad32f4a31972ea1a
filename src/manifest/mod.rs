//! Version store
//!
//! Reads the canonical version from the primary JSON manifest and propagates
//! a version into the other manifests, each with a format-appropriate writer:
//!
//! - **json**: structured rewrite of the top-level `"version"` key
//! - **toml_text**: in-place substitution of a `version = "..."` line
//! - **version**: strict parsing and the patch-increment heuristic
//!
//! Missing targets and unmatched version lines are reported in the
//! `SyncReport` as warnings; they never abort a sync.

pub mod json;
pub mod toml_text;
pub mod version;

pub use version::{Version, increment};

use crate::core::config::ManifestsConfig;
use crate::core::error::{ManifestError, ShipResult};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a manifest stores its version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestKind {
  /// Structured JSON, `"version"` key at the top level
  Json,
  /// TOML edited as text, `version = "..."` inside a section
  TomlText,
}

/// One manifest participating in a sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestTarget {
  /// Path as configured, relative to the project root
  pub rel_path: PathBuf,
  /// Absolute path
  pub path: PathBuf,
  pub kind: ManifestKind,
}

/// What happened to one target during a sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
  Updated { from: Option<String>, to: String },
  Unchanged,
  /// File does not exist (warning)
  Missing,
  /// No version line found in the expected section (warning)
  PatternNotFound,
}

impl SyncOutcome {
  pub fn is_warning(&self) -> bool {
    matches!(self, SyncOutcome::Missing | SyncOutcome::PatternNotFound)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncEntry {
  pub path: PathBuf,
  pub kind: ManifestKind,
  #[serde(flatten)]
  pub outcome: SyncOutcome,
}

/// Per-target results of one propagate call
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  pub version: String,
  pub entries: Vec<SyncEntry>,
}

impl SyncReport {
  pub fn updated(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|e| matches!(e.outcome, SyncOutcome::Updated { .. }))
      .count()
  }

  pub fn warnings(&self) -> impl Iterator<Item = &SyncEntry> {
    self.entries.iter().filter(|e| e.outcome.is_warning())
  }
}

/// Version currently held by one manifest, for status output
#[derive(Debug, Clone, Serialize)]
pub struct ManifestVersion {
  pub path: PathBuf,
  pub kind: ManifestKind,
  pub primary: bool,
  pub version: Option<String>,
  pub error: Option<String>,
}

/// Reads and writes the version across the configured manifests
#[derive(Debug, Clone)]
pub struct VersionStore {
  primary: ManifestTarget,
  secondaries: Vec<ManifestTarget>,
  toml_section: String,
}

impl VersionStore {
  pub fn from_config(root: &Path, config: &ManifestsConfig) -> Self {
    let target = |rel: &PathBuf, kind| ManifestTarget {
      rel_path: rel.clone(),
      path: root.join(rel),
      kind,
    };

    let secondaries = config
      .json
      .iter()
      .map(|p| target(p, ManifestKind::Json))
      .chain(config.toml.iter().map(|p| target(p, ManifestKind::TomlText)))
      .collect();

    Self {
      primary: target(&config.primary, ManifestKind::Json),
      secondaries,
      toml_section: config.toml_section.clone(),
    }
  }

  pub fn primary(&self) -> &ManifestTarget {
    &self.primary
  }

  pub fn secondaries(&self) -> &[ManifestTarget] {
    &self.secondaries
  }

  /// Primary first, then secondaries in configuration order
  pub fn all_targets(&self) -> Vec<ManifestTarget> {
    std::iter::once(self.primary.clone())
      .chain(self.secondaries.iter().cloned())
      .collect()
  }

  /// Version string from the primary manifest, unvalidated
  pub fn read_raw(&self) -> Result<String, ManifestError> {
    json::read_version(&self.primary.path)
  }

  /// Version from the primary manifest, required to be MAJOR.MINOR.PATCH
  pub fn read_current(&self) -> Result<Version, ManifestError> {
    Version::parse(&self.read_raw()?)
  }

  /// Write `version` into each target
  ///
  /// Idempotent: targets already at `version` are not rewritten. Missing
  /// files and unmatched TOML version lines are recorded as warnings and the
  /// remaining targets are still processed. Malformed files abort.
  pub fn propagate(&self, version: &str, targets: &[ManifestTarget]) -> ShipResult<SyncReport> {
    let mut entries = Vec::with_capacity(targets.len());

    for target in targets {
      let outcome = match target.kind {
        ManifestKind::Json => json::write_version(&target.path, version)?,
        ManifestKind::TomlText => toml_text::write_version(&target.path, &self.toml_section, version)?,
      };
      tracing::debug!(path = %target.path.display(), ?outcome, "propagated version");
      entries.push(SyncEntry {
        path: target.rel_path.clone(),
        kind: target.kind,
        outcome,
      });
    }

    Ok(SyncReport {
      version: version.to_string(),
      entries,
    })
  }

  /// Write `version` into every configured manifest, primary included
  pub fn propagate_all(&self, version: &str) -> ShipResult<SyncReport> {
    self.propagate(version, &self.all_targets())
  }

  /// Read the version held by every manifest without failing on bad ones
  pub fn inspect(&self) -> Vec<ManifestVersion> {
    self
      .all_targets()
      .into_iter()
      .map(|target| {
        let read = match target.kind {
          ManifestKind::Json => json::read_version(&target.path),
          ManifestKind::TomlText => toml_text::read_version(&target.path, &self.toml_section),
        };
        let (version, error) = match read {
          Ok(v) => (Some(v), None),
          Err(e) => (None, Some(e.to_string())),
        };
        ManifestVersion {
          primary: target == self.primary,
          path: target.rel_path,
          kind: target.kind,
          version,
          error,
        }
      })
      .collect()
  }
}

/// Read a manifest as text, mapping a missing file to `ManifestError::Missing`
pub(crate) fn read_text(path: &Path) -> Result<String, ManifestError> {
  fs::read_to_string(path).map_err(|e| match e.kind() {
    io::ErrorKind::NotFound => ManifestError::Missing {
      path: path.to_path_buf(),
    },
    _ => ManifestError::Malformed {
      path: path.to_path_buf(),
      reason: e.to_string(),
    },
  })
}


#[cfg(test)]
mod tests {
  use super::fixtures::*;
  use super::*;
  use tempfile::TempDir;

  fn store(root: &Path) -> VersionStore {
    VersionStore::from_config(root, &ManifestsConfig::default())
  }

  fn snapshot(root: &Path) -> Vec<Vec<u8>> {
    ["package.json", "src-tauri/tauri.conf.json", "src-tauri/Cargo.toml"]
      .iter()
      .map(|p| fs::read(root.join(p)).unwrap())
      .collect()
  }

  #[test]
  fn test_read_current() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    assert_eq!(store(dir.path()).read_current().unwrap().to_string(), "1.0.0");
  }

  #[test]
  fn test_read_current_errors() {
    let dir = TempDir::new().unwrap();
    let store = store(dir.path());
    assert!(matches!(store.read_current(), Err(ManifestError::Missing { .. })));

    fs::write(dir.path().join("package.json"), "{ not json").unwrap();
    assert!(matches!(store.read_current(), Err(ManifestError::Malformed { .. })));

    fs::write(dir.path().join("package.json"), "{ \"name\": \"app\" }").unwrap();
    assert!(matches!(store.read_current(), Err(ManifestError::VersionMissing { .. })));

    fs::write(dir.path().join("package.json"), "{ \"version\": \"2.0\" }").unwrap();
    assert!(matches!(store.read_current(), Err(ManifestError::InvalidVersion { .. })));
    assert_eq!(store.read_raw().unwrap(), "2.0");
  }

  #[test]
  fn test_propagate_all_writes_every_manifest() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    let store = store(dir.path());

    let report = store.propagate_all("2.1.0").unwrap();
    assert_eq!(report.updated(), 3);
    assert_eq!(report.warnings().count(), 0);

    for entry in store.inspect() {
      assert_eq!(entry.version.as_deref(), Some("2.1.0"), "{}", entry.path.display());
    }
  }

  #[test]
  fn test_propagate_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    let store = store(dir.path());

    store.propagate_all("1.0.1").unwrap();
    let first = snapshot(dir.path());

    let report = store.propagate_all("1.0.1").unwrap();
    assert_eq!(report.updated(), 0);
    assert!(report.entries.iter().all(|e| e.outcome == SyncOutcome::Unchanged));
    assert_eq!(snapshot(dir.path()), first);
  }

  #[test]
  fn test_propagate_secondaries_only() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    fs::write(
      dir.path().join("package.json"),
      PACKAGE_JSON.replace("\"1.0.0\"", "\"1.0.1\""),
    )
    .unwrap();
    let store = store(dir.path());

    let current = store.read_current().unwrap().to_string();
    let report = store.propagate(&current, store.secondaries()).unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.updated(), 2);

    let tauri = fs::read_to_string(dir.path().join("src-tauri/tauri.conf.json")).unwrap();
    assert_eq!(tauri, TAURI_CONF.replace("1.0.0", "1.0.1"));
    let cargo = fs::read_to_string(dir.path().join("src-tauri/Cargo.toml")).unwrap();
    assert_eq!(cargo, CARGO_TOML.replace("version = \"1.0.0\"", "version = \"1.0.1\""));
  }

  #[test]
  fn test_missing_target_warns_and_continues() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    fs::remove_file(dir.path().join("src-tauri/tauri.conf.json")).unwrap();
    let store = store(dir.path());

    let report = store.propagate_all("1.1.0").unwrap();
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].path, PathBuf::from("src-tauri/tauri.conf.json"));
    assert_eq!(warnings[0].outcome, SyncOutcome::Missing);

    let cargo = fs::read_to_string(dir.path().join("src-tauri/Cargo.toml")).unwrap();
    assert!(cargo.contains("version = \"1.1.0\""));
  }

  #[test]
  fn test_unmatched_toml_version_is_a_warning() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    fs::write(
      dir.path().join("src-tauri/Cargo.toml"),
      "[package]\nname = \"desktop-app\"\nversion.workspace = true\n",
    )
    .unwrap();

    let report = store(dir.path()).propagate_all("1.1.0").unwrap();
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].outcome, SyncOutcome::PatternNotFound);
    assert_eq!(report.updated(), 2);
  }

  #[test]
  fn test_report_serializes_flat() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    let report = store(dir.path()).propagate_all("1.0.0").unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["entries"][0]["status"], "unchanged");
    assert_eq!(json["entries"][2]["kind"], "toml_text");
  }
}
