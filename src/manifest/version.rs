//! Version strings
//!
//! Two paths with different strictness: reading the current release version
//! requires `MAJOR.MINOR.PATCH`, while `increment` works on whatever string the
//! manifest holds.

use crate::core::error::ManifestError;
use std::fmt;

/// A strict `MAJOR.MINOR.PATCH` version without pre-release or build metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(semver::Version);

impl Version {
  /// Parse a version, accepting an optional leading `v`
  pub fn parse(input: &str) -> Result<Self, ManifestError> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    let parsed = semver::Version::parse(bare).map_err(|e| ManifestError::InvalidVersion {
      version: input.to_string(),
      reason: e.to_string(),
    })?;

    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
      return Err(ManifestError::InvalidVersion {
        version: input.to_string(),
        reason: "pre-release and build metadata are not supported".to_string(),
      });
    }

    Ok(Self(parsed))
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Bump the patch component of a raw version string
///
/// `1.2.3` becomes `1.2.4`. Anything that isn't three dot-separated components
/// with a numeric patch gets a literal `.1` appended instead (`2.0` becomes
/// `2.0.1`).
pub fn increment(version: &str) -> String {
  let parts: Vec<&str> = version.split('.').collect();
  if let [major, minor, patch] = parts.as_slice()
    && !patch.is_empty()
    && patch.bytes().all(|b| b.is_ascii_digit())
    && let Ok(patch) = patch.parse::<u64>()
    && let Some(next) = patch.checked_add(1)
  {
    return format!("{}.{}.{}", major, minor, next);
  }
  format!("{}.1", version)
}
