//! Project configuration (`ship.toml`)

use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for tagship
/// Searched in order: ship.toml, .ship.toml, .config/ship.toml
///
/// Every field has a default, so a project without a config file behaves like
/// a stock Tauri layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipConfig {
  #[serde(default)]
  pub manifests: ManifestsConfig,
  #[serde(default)]
  pub git: GitConfig,
  #[serde(default)]
  pub dev: DevConfig,
}

/// Which files hold the version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestsConfig {
  /// Source of truth (JSON with a top-level "version")
  #[serde(default = "default_primary")]
  pub primary: PathBuf,

  /// JSON files mirroring the version
  #[serde(default = "default_json")]
  pub json: Vec<PathBuf>,

  /// TOML files with a `version = "..."` line, rewritten in place
  #[serde(default = "default_toml")]
  pub toml: Vec<PathBuf>,

  /// Section holding the version line in the TOML files
  #[serde(default = "default_toml_section")]
  pub toml_section: String,
}

fn default_primary() -> PathBuf {
  PathBuf::from("package.json")
}

fn default_json() -> Vec<PathBuf> {
  vec![PathBuf::from("src-tauri/tauri.conf.json")]
}

fn default_toml() -> Vec<PathBuf> {
  vec![PathBuf::from("src-tauri/Cargo.toml")]
}

fn default_toml_section() -> String {
  "package".to_string()
}

impl Default for ManifestsConfig {
  fn default() -> Self {
    Self {
      primary: default_primary(),
      json: default_json(),
      toml: default_toml(),
      toml_section: default_toml_section(),
    }
  }
}

/// Remote, branch, tag naming and commit message templates
///
/// Templates understand `{version}` and `{timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
  #[serde(default = "default_remote")]
  pub remote: String,
  #[serde(default = "default_branch")]
  pub branch: String,
  #[serde(default = "default_tag_prefix")]
  pub tag_prefix: String,
  /// Commit message for the plain push flow
  #[serde(default = "default_push_message")]
  pub push_message: String,
  /// Commit message for a new release
  #[serde(default = "default_release_message")]
  pub release_message: String,
  /// Commit message for a fix-mode rebuild
  #[serde(default = "default_fix_message")]
  pub fix_message: String,
  /// chrono strftime pattern for `{timestamp}`
  #[serde(default = "default_timestamp_format")]
  pub timestamp_format: String,
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_branch() -> String {
  "main".to_string()
}

fn default_tag_prefix() -> String {
  "v".to_string()
}

fn default_push_message() -> String {
  "Auto update: {timestamp}".to_string()
}

fn default_release_message() -> String {
  "Release {version} ({timestamp})".to_string()
}

fn default_fix_message() -> String {
  "Rebuild {version} ({timestamp})".to_string()
}

fn default_timestamp_format() -> String {
  "%H:%M %d/%m/%Y".to_string()
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      remote: default_remote(),
      branch: default_branch(),
      tag_prefix: default_tag_prefix(),
      push_message: default_push_message(),
      release_message: default_release_message(),
      fix_message: default_fix_message(),
      timestamp_format: default_timestamp_format(),
    }
  }
}

impl GitConfig {
  /// Tag name for a version, e.g. `v1.2.3`
  pub fn tag_for(&self, version: &str) -> String {
    format!("{}{}", self.tag_prefix, version)
  }

  /// Validate git configuration
  pub fn validate(&self) -> Result<(), String> {
    if self.remote.trim().is_empty() {
      return Err("git.remote must not be empty".to_string());
    }
    if self.branch.trim().is_empty() {
      return Err("git.branch must not be empty".to_string());
    }
    for (name, template) in [
      ("push_message", &self.push_message),
      ("release_message", &self.release_message),
      ("fix_message", &self.fix_message),
    ] {
      if let Some(unknown) = unknown_placeholder(template) {
        return Err(format!(
          "git.{} uses unknown placeholder '{{{}}}' (expected {{version}} or {{timestamp}})",
          name, unknown
        ));
      }
    }
    Ok(())
  }
}

/// Find the first `{name}` in a template that isn't a known placeholder
fn unknown_placeholder(template: &str) -> Option<String> {
  let mut rest = template;
  while let Some(start) = rest.find('{') {
    let after = &rest[start + 1..];
    let end = after.find('}')?;
    let name = &after[..end];
    if name != "version" && name != "timestamp" {
      return Some(name.to_string());
    }
    rest = &after[end + 1..];
  }
  None
}

/// Dev-server helper settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevConfig {
  /// Port the dev server listens on and which gets cleaned
  #[serde(default = "default_port")]
  pub port: u16,
  /// Dev-server command as program + args
  #[serde(default = "default_dev_command")]
  pub command: Vec<String>,
}

fn default_port() -> u16 {
  5173
}

fn default_dev_command() -> Vec<String> {
  ["npm", "run", "tauri", "dev"].iter().map(|s| s.to_string()).collect()
}

impl Default for DevConfig {
  fn default() -> Self {
    Self {
      port: default_port(),
      command: default_dev_command(),
    }
  }
}

impl DevConfig {
  /// Validate dev configuration
  pub fn validate(&self) -> Result<(), String> {
    if self.port == 0 {
      return Err("dev.port must be greater than 0".to_string());
    }
    if self.command.first().is_none_or(|program| program.trim().is_empty()) {
      return Err("dev.command must name a program".to_string());
    }
    Ok(())
  }
}

impl ShipConfig {
  /// Find config file in search order: ship.toml, .ship.toml, .config/ship.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("ship.toml"),
      root.join(".ship.toml"),
      root.join(".config").join("ship.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from ship.toml, falling back to defaults when none exists
  pub fn load(root: &Path) -> ShipResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      tracing::debug!(root = %root.display(), "no ship.toml found, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShipConfig = toml_edit::de::from_str(&content).map_err(|e| ConfigError::Invalid {
      path: config_path.clone(),
      reason: e.to_string(),
    })?;

    config.validate().map_err(|reason| ConfigError::Invalid {
      path: config_path.clone(),
      reason,
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  /// Validate the whole configuration
  pub fn validate(&self) -> Result<(), String> {
    self.git.validate()?;
    self.dev.validate()?;
    if self.manifests.toml_section.trim().is_empty() {
      return Err("manifests.toml_section must not be empty".to_string());
    }
    Ok(())
  }

  /// Save config to ship.toml (default location)
  pub fn save(&self, root: &Path) -> ShipResult<PathBuf> {
    let config_path = root.join("ship.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Write a default ship.toml, refusing to clobber an existing one unless `force`
  pub fn init(root: &Path, force: bool) -> ShipResult<PathBuf> {
    if !force && let Some(existing) = Self::find_config_path(root) {
      return Err(ShipError::Config(ConfigError::AlreadyExists { path: existing }));
    }
    Self::default().save(root)
  }
}
