//! GUI command implementation

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;

/// Open the graphical release front-end
#[cfg(feature = "gui")]
pub fn run_gui(ctx: &ProjectContext) -> ShipResult<()> {
  crate::ui::gui::run(ctx.clone())
}

#[cfg(not(feature = "gui"))]
pub fn run_gui(_ctx: &ProjectContext) -> ShipResult<()> {
  Err(crate::core::error::ShipError::with_help(
    "This build of tagship has no graphical front-end",
    "Reinstall with `cargo install tagship --features gui`.",
  ))
}
