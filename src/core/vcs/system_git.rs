//! System git backend
//!
//! Drives the `git` binary through a `CommandRunner`. Each call is one
//! subprocess with a fixed argument vector, run inside the project root with
//! a couple of safe configuration overrides.

use crate::core::error::ShipResult;
use crate::core::process::{CommandOutput, CommandRunner, ProcessCommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How a failed git call should be treated by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
  /// Non-zero exit aborts the workflow
  Fatal,
  /// Non-zero exit is expected sometimes (e.g. deleting a tag that isn't there)
  Ignorable,
}

/// One line of `git status --porcelain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
  /// Two-letter XY status code, e.g. " M", "??", "A "
  pub code: String,
  pub path: String,
}

/// Git backend using system git
#[derive(Clone)]
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,

  runner: Arc<dyn CommandRunner>,
}

impl SystemGit {
  /// Create a backend rooted at `work_tree`; no subprocess is spawned
  pub fn new(work_tree: &Path, runner: Arc<dyn CommandRunner>) -> Self {
    Self {
      work_tree: work_tree.to_path_buf(),
      runner,
    }
  }

  /// Check whether the root is inside a git working tree
  pub fn is_repository(&self) -> bool {
    self
      .exec(&["rev-parse", "--is-inside-work-tree"], Failure::Fatal)
      .map(|out| out.stdout.trim() == "true")
      .unwrap_or(false)
  }

  /// Get current branch name
  pub fn current_branch(&self) -> ShipResult<String> {
    match self.exec(&["rev-parse", "--abbrev-ref", "HEAD"], Failure::Ignorable) {
      Ok(output) => Ok(output.stdout.trim().to_string()),
      Err(err) if err.is_ignorable() => Ok("HEAD".to_string()), // Unborn or detached HEAD
      Err(err) => Err(err),
    }
  }

  /// `git status --porcelain`, raw
  pub fn status_porcelain(&self) -> ShipResult<String> {
    Ok(self.exec(&["status", "--porcelain"], Failure::Fatal)?.stdout)
  }

  /// Parsed `git status --porcelain`
  pub fn status_entries(&self) -> ShipResult<Vec<StatusEntry>> {
    Ok(parse_porcelain(&self.status_porcelain()?))
  }

  /// True when the working tree or index differs from HEAD
  pub fn has_uncommitted_changes(&self) -> ShipResult<bool> {
    Ok(!self.status_porcelain()?.trim().is_empty())
  }

  /// Run `git <args>` and fail on non-zero exit
  ///
  /// The returned error carries the `ignorable` flag from `failure`, so callers
  /// can decide whether to log and continue.
  pub(crate) fn exec(&self, args: &[&str], failure: Failure) -> ShipResult<CommandOutput> {
    let cmd = self.git_cmd().args(args.iter().copied());
    let output = self.runner.run(&cmd)?;
    output.check(&cmd, failure == Failure::Ignorable)
  }

  /// Build a git command rooted at the working tree
  ///
  /// - Sets working directory to the project root
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> ProcessCommand {
    ProcessCommand::new("git")
      .args(["-c", "core.quotePath=false"]) // Don't escape non-ASCII
      .args(["-c", "advice.detachedHead=false"])
      .current_dir(&self.work_tree)
  }
}

/// Parse porcelain v1 output into entries, skipping blank lines
pub fn parse_porcelain(output: &str) -> Vec<StatusEntry> {
  output
    .lines()
    .filter(|line| line.len() > 3)
    .map(|line| StatusEntry {
      code: line[..2].to_string(),
      path: line[3..].to_string(),
    })
    .collect()
}
