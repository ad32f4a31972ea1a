//! Status command implementation

use serde::Serialize;

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::manifest::ManifestVersion;

/// Versions across all manifests
#[derive(Debug, Clone, Serialize)]
pub struct VersionStatus {
  /// Version in the primary manifest
  pub current: Option<String>,

  /// Tag that version would be released under
  pub tag: Option<String>,

  /// Every manifest holds the same version
  pub in_sync: bool,

  /// Working tree has uncommitted changes (None outside a git repository)
  pub dirty: Option<bool>,

  /// Number of changed paths in the working tree
  pub changes: usize,

  /// Checked-out branch (None outside a git repository)
  pub branch: Option<String>,

  /// The current version's tag exists locally
  pub tagged: Option<bool>,

  pub manifests: Vec<ManifestVersion>,
}

impl VersionStatus {
  pub fn gather(ctx: &ProjectContext) -> Self {
    let manifests = ctx.version_store().inspect();
    let current = manifests.iter().find(|m| m.primary).and_then(|m| m.version.clone());
    let in_sync = current.is_some()
      && manifests
        .iter()
        .filter(|m| m.error.is_none())
        .all(|m| m.version == current);

    let tag = current.as_deref().map(|v| ctx.config.git.tag_for(v));

    let git = ctx.git();
    let (dirty, changes, branch, tagged) = if git.is_repository() {
      let entries = git.status_entries().ok();
      (
        entries.as_ref().map(|e| !e.is_empty()),
        entries.map(|e| e.len()).unwrap_or(0),
        git.current_branch().ok(),
        tag.as_deref().and_then(|t| git.tag_exists(t).ok()),
      )
    } else {
      (None, 0, None, None)
    };

    Self {
      current,
      tag,
      in_sync,
      dirty,
      changes,
      branch,
      tagged,
      manifests,
    }
  }
}

/// Run the status command
pub fn run_status(ctx: &ProjectContext, json: bool) -> ShipResult<()> {
  let status = VersionStatus::gather(ctx);

  if json {
    println!("{}", serde_json::to_string_pretty(&status)?);
    return Ok(());
  }

  println!("📦 Project: {}", ctx.root.display());
  match &status.current {
    Some(version) => println!("   Current version: {}", version),
    None => println!("   Current version: unknown"),
  }
  if let Some(branch) = &status.branch {
    println!("   Branch: {}", branch);
  }
  if let (Some(tag), Some(tagged)) = (&status.tag, status.tagged) {
    println!("   Tag {}: {}", tag, if tagged { "exists" } else { "not created yet" });
  }
  println!();

  for manifest in &status.manifests {
    let marker = if manifest.primary { " (primary)" } else { "" };
    match (&manifest.version, &manifest.error) {
      (Some(version), _) => {
        let icon = if Some(version) == status.current.as_ref() { "✅" } else { "⚠️ " };
        println!("  {} {}{}: {}", icon, manifest.path.display(), marker, version);
      }
      (None, Some(error)) => {
        let first = error.lines().next().unwrap_or_default();
        println!("  ❌ {}{}: {}", manifest.path.display(), marker, first);
      }
      (None, None) => println!("  ❌ {}{}: no version", manifest.path.display(), marker),
    }
  }

  println!();
  if status.in_sync {
    println!("✅ All manifests agree");
  } else {
    println!("⚠️  Manifests disagree, run `tagship sync` to align them");
  }
  match status.dirty {
    Some(true) => println!("📝 Uncommitted changes present ({} path(s))", status.changes),
    Some(false) => println!("🧹 Working tree clean"),
    None => println!("ℹ️  Not a git repository"),
  }
  Ok(())
}
