//! Dev command implementation

use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult};
use crate::devserver::{DevServer, interrupt_flag};
use crate::ui::log::ConsoleSink;

/// Run the dev server on `port` (or the configured one) with port cleanup
pub fn run_dev(ctx: &ProjectContext, port: Option<u16>) -> ShipResult<()> {
  if port == Some(0) {
    return Err(ShipError::message("--port must be greater than 0"));
  }

  let interrupted = interrupt_flag()?;
  match DevServer::new(ctx, port, &ConsoleSink).run(&interrupted)? {
    Some(status) if !status.success() => Err(ShipError::with_help(
      format!("Dev server exited with {}", status),
      "Check the output above for the dev server's own error.",
    )),
    _ => Ok(()),
  }
}
