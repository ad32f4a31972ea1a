//! Dev-server helper
//!
//! Frees the dev-server port, runs the configured dev command in the project
//! root until it exits or Ctrl-C arrives, then frees the port again.

use crate::core::context::ProjectContext;
use crate::core::error::{CommandError, ShipError, ShipResult};
use crate::core::process::{CommandRunner, ProcessCommand};
use crate::ui::log::LogSink;
use std::collections::BTreeSet;
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Parse `netstat -ano` output for PIDs listening on or connected from `port`
///
/// Only the local address column is matched, and only the exact port, so
/// 51730 does not match 5173. PID 0 (System Idle) is skipped.
pub fn parse_netstat(output: &str, port: u16) -> Vec<u32> {
  let suffix = format!(":{}", port);
  let mut pids = BTreeSet::new();

  for line in output.lines() {
    let parts: Vec<&str> = line.split_whitespace().collect();
    // Proto  Local Address  Foreign Address  State  PID
    if parts.len() < 5 || !parts[1].ends_with(&suffix) {
      continue;
    }
    if let Some(pid) = parts.last().and_then(|p| p.parse::<u32>().ok())
      && pid != 0
    {
      pids.insert(pid);
    }
  }
  pids.into_iter().collect()
}

/// Parse `lsof -F pn` output for PIDs with a socket bound locally to `port`
///
/// Each `p<pid>` record is followed by `n<local>[-><remote>]` entries. Only the
/// local side counts, so clients connected to `port` are left alone.
pub fn parse_lsof(output: &str, port: u16) -> Vec<u32> {
  let suffix = format!(":{}", port);
  let mut pids = BTreeSet::new();
  let mut current = None;

  for line in output.lines() {
    let line = line.trim();
    if let Some(pid) = line.strip_prefix('p') {
      current = pid.parse::<u32>().ok().filter(|pid| *pid != 0);
    } else if let Some(name) = line.strip_prefix('n') {
      let local = name.split("->").next().unwrap_or(name);
      if let Some(pid) = current
        && local.ends_with(&suffix)
      {
        pids.insert(pid);
      }
    }
  }
  pids.into_iter().collect()
}

/// Finds and kills processes holding a TCP port
pub struct PortCleaner {
  runner: Arc<dyn CommandRunner>,
}

impl PortCleaner {
  pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
    Self { runner }
  }

  /// PIDs owning `port`, de-duplicated
  pub fn owners(&self, port: u16) -> ShipResult<Vec<u32>> {
    if cfg!(windows) {
      let output = self.runner.run(&ProcessCommand::new("netstat").arg("-ano"))?;
      Ok(parse_netstat(&output.stdout, port))
    } else {
      let cmd = ProcessCommand::new("lsof").args(["-nP", "-F", "pn", &format!("-iTCP:{}", port)]);
      // lsof exits 1 with no output when nothing matches
      let output = self.runner.run(&cmd)?;
      Ok(parse_lsof(&output.stdout, port))
    }
  }

  /// Kill every owner of `port`, returning the PIDs that were signalled
  ///
  /// Lookup failures are logged as warnings and never fatal.
  pub fn clean(&self, port: u16, sink: &dyn LogSink) -> Vec<u32> {
    sink.step(&format!("Cleaning port {}", port));

    let owners = match self.owners(port) {
      Ok(owners) => owners,
      Err(err) => {
        tracing::warn!(port, error = %err, "port owner lookup failed");
        sink.warn(&format!("Could not inspect port {}: {}", port, err));
        return Vec::new();
      }
    };

    if owners.is_empty() {
      sink.info(&format!("Port {} is clean", port));
      return owners;
    }

    let mut system = System::new();
    let pids: Vec<Pid> = owners.iter().map(|pid| Pid::from_u32(*pid)).collect();
    system.refresh_processes(ProcessesToUpdate::Some(&pids), true);

    let mut killed = Vec::new();
    for pid in owners {
      let Some(process) = system.process(Pid::from_u32(pid)) else {
        tracing::debug!(pid, "port owner already gone");
        continue;
      };
      let name = process.name().to_string_lossy().to_string();
      if process.kill() {
        sink.info(&format!("Killed PID {} ({})", pid, name));
        killed.push(pid);
      } else {
        sink.warn(&format!("Could not kill PID {} ({})", pid, name));
      }
    }
    killed
  }
}

/// Runs the configured dev command with port cleanup around it
pub struct DevServer<'a> {
  ctx: &'a ProjectContext,
  port: u16,
  sink: &'a dyn LogSink,
}

impl<'a> DevServer<'a> {
  pub fn new(ctx: &'a ProjectContext, port: Option<u16>, sink: &'a dyn LogSink) -> Self {
    Self {
      ctx,
      port: port.unwrap_or(ctx.config.dev.port),
      sink,
    }
  }

  /// Clean, run until exit or `interrupted` is set, clean again
  ///
  /// Returns the child's exit status, or `None` when stopped by an interrupt.
  pub fn run(&self, interrupted: &AtomicBool) -> ShipResult<Option<ExitStatus>> {
    let cleaner = PortCleaner::new(self.ctx.runner.clone());
    cleaner.clean(self.port, self.sink);

    let result = self.supervise(interrupted);

    self.sink.step("Final cleanup");
    cleaner.clean(self.port, self.sink);

    let status = result?;
    self.sink.success("Done");
    Ok(status)
  }

  fn supervise(&self, interrupted: &AtomicBool) -> ShipResult<Option<ExitStatus>> {
    let mut command = dev_command(&self.ctx.config.dev.command);
    let command_line = self.ctx.config.dev.command.join(" ");
    self.sink.step(&format!("Running {}", command_line));

    let mut child = command
      .current_dir(&self.ctx.root)
      .spawn()
      .map_err(|source| CommandError::Spawn {
        command: command_line.clone(),
        source,
      })?;
    tracing::debug!(pid = child.id(), command = %command_line, "dev server started");

    loop {
      if let Some(status) = child.try_wait()? {
        tracing::debug!(?status, "dev server exited");
        if !status.success() {
          self.sink.warn(&format!("{} exited with {}", command_line, status));
        }
        return Ok(Some(status));
      }
      if interrupted.load(Ordering::SeqCst) {
        self.sink.step("Stopping dev server");
        // The child may already be gone from the same Ctrl-C
        let _ = child.kill();
        child.wait()?;
        return Ok(None);
      }
      thread::sleep(POLL_INTERVAL);
    }
  }
}

/// Flag set by the first Ctrl-C
///
/// The handler can be installed once per process.
pub fn interrupt_flag() -> ShipResult<Arc<AtomicBool>> {
  let interrupted = Arc::new(AtomicBool::new(false));
  let flag = interrupted.clone();
  ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
    .map_err(|e| ShipError::message(format!("Failed to install Ctrl-C handler: {}", e)))?;
  Ok(interrupted)
}

/// Build the platform command for a program + args list
fn dev_command(parts: &[String]) -> Command {
  if cfg!(windows) {
    // npm and friends are .cmd shims on Windows
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").args(parts);
    cmd
  } else {
    let mut cmd = Command::new(parts.first().map(String::as_str).unwrap_or("npm"));
    cmd.args(parts.iter().skip(1));
    cmd
  }
}
