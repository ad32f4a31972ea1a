//! Release command implementation

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::release::{ReleaseOutcome, ReleaseRequest, ReleaseWorkflow, VersionChoice};
use crate::ui::log::ConsoleSink;

/// Run the release command
///
/// `--fix` rebuilds the current version; otherwise `version` (or a patch bump
/// when absent) is propagated, committed, pushed and tagged.
pub fn run_release(ctx: &ProjectContext, version: Option<String>, fix: bool) -> ShipResult<()> {
  let request = if fix {
    ReleaseRequest::fix()
  } else {
    let choice = match version {
      Some(v) => VersionChoice::Explicit(v),
      None => VersionChoice::Increment,
    };
    ReleaseRequest::new_release(choice)
  };

  println!("{}", "=".repeat(40));
  println!("🚀 tagship: {}", if fix { "rebuild current version" } else { "new release" });
  println!("{}", "=".repeat(40));

  let outcome = ReleaseWorkflow::new(ctx, &ConsoleSink).run(&request)?;
  print_summary(&outcome);
  Ok(())
}

fn print_summary(outcome: &ReleaseOutcome) {
  println!();
  println!("📦 Version: {}", outcome.version);
  println!("🏷️  Tag:     {}", outcome.tag);
  if let Some(sync) = &outcome.sync {
    let warnings = sync.warnings().count();
    println!("📝 Manifests updated: {}", sync.updated());
    if warnings > 0 {
      println!("⚠️  {} manifest(s) skipped, see warnings above", warnings);
    }
  }
  if !outcome.committed {
    println!("ℹ️  No commit was created in this run");
  }
  println!();
  println!("💡 CI picks up tag {} and builds the release", outcome.tag);
}
