//! Release workflow orchestration
//!
//! # Ordering invariants
//!
//! 1. **Branch before tag**: the commit is pushed before the tag is created,
//!    so a tag never points at an unpushed commit.
//! 2. **Delete before recreate**: in fix mode the remote and local tags are
//!    removed before the fresh tag is created, so the remote never holds two
//!    different commits under one tag name.
//!
//! # Modes
//!
//! - **Fix**: rebuild the current version. Commit only if the tree is dirty,
//!   push, delete the tag (remote then local, failures tolerated), recreate it,
//!   push it.
//! - **New release**: propagate the target version into every manifest, stage,
//!   commit, push, tag, push the tag.
//!
//! The whole run is sequential; the first unignored failure stops it and no
//! later step runs. There are no retries and no rollback.

#[cfg(any(feature = "gui", test))]
pub mod worker;
pub mod workflow;

#[cfg(feature = "gui")]
pub use worker::{ReleaseController, WorkerEvent};
pub use workflow::ReleaseWorkflow;

use crate::manifest::SyncReport;
use serde::Serialize;

/// Where the release version comes from in new-release mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChoice {
  /// User-supplied, validated as MAJOR.MINOR.PATCH
  Explicit(String),
  /// Patch bump of whatever the primary manifest holds
  Increment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseMode {
  /// Recreate the tag for the current version without bumping it
  Fix,
  /// Bump the version and publish it
  NewRelease(VersionChoice),
}

/// What a failing release commit means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
  /// Abort the run (command line)
  Strict,
  /// Log a warning and keep going (interactive front-end)
  Tolerant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
  pub mode: ReleaseMode,
  pub commit_policy: CommitPolicy,
}

impl ReleaseRequest {
  pub fn fix() -> Self {
    Self {
      mode: ReleaseMode::Fix,
      commit_policy: CommitPolicy::Strict,
    }
  }

  pub fn new_release(choice: VersionChoice) -> Self {
    Self {
      mode: ReleaseMode::NewRelease(choice),
      commit_policy: CommitPolicy::Strict,
    }
  }

  pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
    self.commit_policy = policy;
    self
  }
}

/// Result of a finished release run
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseOutcome {
  pub version: String,
  pub tag: String,
  /// Whether a commit was created in this run
  pub committed: bool,
  /// Manifest sync results (new-release mode only)
  pub sync: Option<SyncReport>,
}

/// Result of the plain push flow
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
  pub committed: bool,
  pub remote: String,
  pub branch: String,
}
