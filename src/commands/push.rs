//! Push command implementation

use crate::core::context::ProjectContext;
use crate::core::error::{ResultExt, ShipResult};
use crate::release::ReleaseWorkflow;
use crate::ui::log::ConsoleSink;
use crate::ui::prompt;

/// Run the push command
///
/// `tag` is `Some(true)` for `--tag`, `Some(false)` for `--no-tag`, and `None`
/// to ask interactively after the push.
pub fn run_push(ctx: &ProjectContext, tag: Option<bool>) -> ShipResult<()> {
  println!("{}", "=".repeat(40));
  println!("☁️  tagship: push");
  println!("{}", "=".repeat(40));

  let workflow = ReleaseWorkflow::new(ctx, &ConsoleSink);
  let pushed = workflow.push_changes()?;
  println!("✅ Pushed to {}/{}", pushed.remote, pushed.branch);

  let create_tag = match tag {
    Some(choice) => choice,
    None => {
      let version = workflow.current_version()?;
      let tag_name = ctx.config.git.tag_for(&version.to_string());
      prompt::confirm(&format!("Create release tag {}?", tag_name)).context("Failed to read answer from stdin")?
    }
  };

  if create_tag {
    workflow.tag_current()?;
  } else {
    println!("ℹ️  Skipped tagging");
  }
  Ok(())
}
