//! TOML manifests rewritten as text (src-tauri/Cargo.toml)
//!
//! Only the quoted value of the first `version = "..."` line inside the target
//! section is replaced. Every other byte (comments, spacing, line endings,
//! key order) is left untouched. `toml_edit` is used for reading and for
//! rejecting files that don't parse before they are touched.

use super::{SyncOutcome, read_text};
use crate::core::error::{ManifestError, ResultExt, ShipResult};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static SECTION_HEADER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"^\s*\[\[?\s*([^\[\]]+?)\s*\]\]?\s*(#.*)?$"#).expect("valid section regex"));

static VERSION_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"^\s*version\s*=\s*"([^"]*)""#).expect("valid version regex"));

/// Result of rewriting manifest text in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
  /// Version line found with a different value
  Replaced { from: String, content: String },
  /// Version line already holds the requested value
  Unchanged,
  /// No version line inside the section
  NotFound,
}

/// Replace the version value inside `[section]`, preserving everything else
pub fn rewrite_version(content: &str, section: &str, version: &str) -> Rewrite {
  let mut current_section: Option<String> = None;
  let mut offset = 0;

  for line in content.split_inclusive('\n') {
    let body = line.trim_end_matches(['\n', '\r']);

    if let Some(caps) = SECTION_HEADER.captures(body) {
      current_section = Some(caps[1].to_string());
    } else if current_section.as_deref() == Some(section)
      && let Some(caps) = VERSION_LINE.captures(body)
      && let Some(value) = caps.get(1)
    {
      if value.as_str() == version {
        return Rewrite::Unchanged;
      }
      let start = offset + value.start();
      let end = offset + value.end();
      let mut rewritten = String::with_capacity(content.len() + version.len());
      rewritten.push_str(&content[..start]);
      rewritten.push_str(version);
      rewritten.push_str(&content[end..]);
      return Rewrite::Replaced {
        from: value.as_str().to_string(),
        content: rewritten,
      };
    }

    offset += line.len();
  }

  Rewrite::NotFound
}

fn parse(path: &Path, content: &str) -> Result<toml_edit::DocumentMut, ManifestError> {
  content.parse::<toml_edit::DocumentMut>().map_err(|e| ManifestError::Malformed {
    path: path.to_path_buf(),
    reason: e.to_string(),
  })
}

/// Read `[section].version` with a full TOML parse
pub fn read_version(path: &Path, section: &str) -> Result<String, ManifestError> {
  let content = read_text(path)?;
  let doc = parse(path, &content)?;

  let table = section
    .split('.')
    .try_fold(doc.as_item(), |item, key| item.get(key))
    .ok_or_else(|| ManifestError::VersionMissing {
      path: path.to_path_buf(),
    })?;

  table
    .get("version")
    .and_then(|v| v.as_str())
    .map(str::to_string)
    .ok_or_else(|| ManifestError::VersionMissing {
      path: path.to_path_buf(),
    })
}

/// Rewrite the version line in place
pub fn write_version(path: &Path, section: &str, version: &str) -> ShipResult<SyncOutcome> {
  let content = match read_text(path) {
    Ok(content) => content,
    Err(ManifestError::Missing { .. }) => return Ok(SyncOutcome::Missing),
    Err(e) => return Err(e.into()),
  };
  parse(path, &content)?;

  match rewrite_version(&content, section, version) {
    Rewrite::Unchanged => Ok(SyncOutcome::Unchanged),
    Rewrite::NotFound => Ok(SyncOutcome::PatternNotFound),
    Rewrite::Replaced { from, content } => {
      fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
      Ok(SyncOutcome::Updated {
        from: Some(from),
        to: version.to_string(),
      })
    }
  }
}
