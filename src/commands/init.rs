//! Init command implementation

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use std::path::Path;

/// Write a default ship.toml into the project root
pub fn run_init(root: &Path, force: bool) -> ShipResult<()> {
  let path = ShipConfig::init(root, force)?;
  let config = ShipConfig::default();

  println!("✅ Wrote {}", path.display());
  println!();
  println!("   primary manifest: {}", config.manifests.primary.display());
  println!("   remote/branch:    {}/{}", config.git.remote, config.git.branch);
  println!("   tag format:       {}", config.git.tag_for("X.Y.Z"));
  println!();
  println!("💡 Edit [manifests] to list every file that carries the version.");
  Ok(())
}
