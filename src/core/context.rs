//! Project context - build once, pass everywhere
//!
//! The project root is always explicit. Nothing in tagship changes the process
//! working directory; every path is resolved against `ProjectContext::root`
//! and every subprocess gets the root as its working directory.

use crate::core::config::ShipConfig;
use crate::core::error::{ResultExt, ShipResult};
use crate::core::process::{CommandRunner, SystemRunner};
use crate::core::vcs::SystemGit;
use crate::manifest::VersionStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared project-level state: root, configuration, and the command runner
#[derive(Clone)]
pub struct ProjectContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// Configuration (ship.toml or defaults)
  pub config: Arc<ShipConfig>,

  /// Executes git and other external commands
  pub runner: Arc<dyn CommandRunner>,
}

impl ProjectContext {
  /// Build the context for a project root using the system runner
  pub fn build(root: &Path) -> ShipResult<Self> {
    let root = root
      .canonicalize()
      .with_context(|| format!("Project root not found: {}", root.display()))?;
    let config = ShipConfig::load(&root)?;
    Ok(Self::with_parts(root, config, Arc::new(SystemRunner)))
  }

  /// Assemble a context from already-loaded parts
  pub fn with_parts(root: PathBuf, config: ShipConfig, runner: Arc<dyn CommandRunner>) -> Self {
    Self {
      root,
      config: Arc::new(config),
      runner,
    }
  }

  /// Git backend rooted at the project
  pub fn git(&self) -> SystemGit {
    SystemGit::new(&self.root, self.runner.clone())
  }

  /// Version store over the configured manifests
  pub fn version_store(&self) -> VersionStore {
    VersionStore::from_config(&self.root, &self.config.manifests)
  }
}
