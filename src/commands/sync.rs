//! Sync command implementation
//!
//! Writes a version into every configured manifest without touching git.

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::manifest::{SyncOutcome, SyncReport, Version};

/// Run the sync command
///
/// Without `version`, the primary manifest's version is mirrored into the
/// secondaries. With one, every manifest including the primary is updated.
pub fn run_sync(ctx: &ProjectContext, version: Option<String>, json: bool) -> ShipResult<()> {
  let store = ctx.version_store();

  let report = match version {
    Some(requested) => {
      let version = Version::parse(&requested)?.to_string();
      store.propagate_all(&version)?
    }
    None => {
      let current = store.read_current()?.to_string();
      store.propagate(&current, store.secondaries())?
    }
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }
  Ok(())
}

fn print_report(report: &SyncReport) {
  println!("🔄 Syncing version {}", report.version);
  for entry in &report.entries {
    let path = entry.path.display();
    match &entry.outcome {
      SyncOutcome::Updated { from, to } => {
        println!("  ✅ {}: {} -> {}", path, from.as_deref().unwrap_or("(none)"), to)
      }
      SyncOutcome::Unchanged => println!("  ✓  {}: already {}", path, report.version),
      SyncOutcome::Missing => println!("  ⚠️  {}: not found, skipped", path),
      SyncOutcome::PatternNotFound => println!("  ⚠️  {}: no version line found, not updated", path),
    }
  }
  println!();
  println!("{} updated, {} warning(s)", report.updated(), report.warnings().count());
}
