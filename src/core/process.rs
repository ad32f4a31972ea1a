//! External process execution
//!
//! Every external command is a program plus an argument vector, never an
//! interpolated shell string. Execution goes through the `CommandRunner` trait
//! so workflows can be driven by a recording runner in tests.

use crate::core::error::{CommandError, ShipResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A fully specified external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
}

impl ProcessCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }
}

impl fmt::Display for ProcessCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " \"{}\"", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code, `None` when terminated by a signal
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// Turn a non-zero exit into `CommandError::Failed`
  pub fn check(self, command: &ProcessCommand, ignorable: bool) -> ShipResult<Self> {
    if self.success() {
      return Ok(self);
    }
    Err(
      CommandError::Failed {
        command: command.to_string(),
        code: self.code,
        stderr: if self.stderr.trim().is_empty() {
          self.stdout
        } else {
          self.stderr
        },
        ignorable,
      }
      .into(),
    )
  }
}

/// Runs external commands to completion
///
/// Implementations only report spawn failures as errors; a non-zero exit is a
/// normal `CommandOutput` that callers inspect.
pub trait CommandRunner: Send + Sync {
  fn run(&self, command: &ProcessCommand) -> ShipResult<CommandOutput>;
}

/// Runs commands with `std::process::Command`, capturing stdout and stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, command: &ProcessCommand) -> ShipResult<CommandOutput> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    if let Some(dir) = &command.cwd {
      cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| CommandError::Spawn {
      command: command.to_string(),
      source,
    })?;

    let result = CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    tracing::debug!(command = %command, code = ?result.code, "command finished");
    Ok(result)
  }
}
