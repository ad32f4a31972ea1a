//! Sequential release, fix, and push flows

use super::{CommitPolicy, PushOutcome, ReleaseMode, ReleaseOutcome, ReleaseRequest, VersionChoice};
use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::core::vcs::{Failure, SystemGit};
use crate::manifest::{SyncOutcome, SyncReport, Version, VersionStore, increment};
use crate::ui::log::LogSink;

/// Runs one release attempt against a project
pub struct ReleaseWorkflow<'a> {
  ctx: &'a ProjectContext,
  git: SystemGit,
  store: VersionStore,
  sink: &'a dyn LogSink,
}

impl<'a> ReleaseWorkflow<'a> {
  pub fn new(ctx: &'a ProjectContext, sink: &'a dyn LogSink) -> Self {
    Self {
      ctx,
      git: ctx.git(),
      store: ctx.version_store(),
      sink,
    }
  }

  /// Run a release in the requested mode
  pub fn run(&self, request: &ReleaseRequest) -> ShipResult<ReleaseOutcome> {
    match &request.mode {
      ReleaseMode::Fix => self.run_fix(),
      ReleaseMode::NewRelease(choice) => self.run_new_release(choice, request.commit_policy),
    }
  }

  /// Rebuild the current version: recreate and push its tag
  fn run_fix(&self) -> ShipResult<ReleaseOutcome> {
    let version = self.store.read_current()?.to_string();
    let tag = self.ctx.config.git.tag_for(&version);
    self.sink.step(&format!("Fix mode: rebuilding {}", tag));

    self.sink.step("Staging changes");
    self.git.stage_all()?;

    let committed = if self.git.has_uncommitted_changes()? {
      let message = self.render(&self.ctx.config.git.fix_message, &version);
      self.sink.step(&format!("Committing: {}", message));
      self.git.commit(&message, Failure::Fatal)?;
      true
    } else {
      self.sink.info("No changes to commit, pushing existing commits");
      false
    };

    self.push_branch()?;

    let remote = &self.ctx.config.git.remote;
    self.sink.step(&format!("Deleting tag {} on {}", tag, remote));
    self.tolerate(self.git.delete_remote_tag(remote, &tag, Failure::Ignorable))?;

    self.sink.step(&format!("Deleting local tag {}", tag));
    self.tolerate(self.git.delete_local_tag(&tag, Failure::Ignorable))?;

    self.create_and_push_tag(&tag, &version)?;

    self.sink.success(&format!("Rebuild of {} triggered", tag));
    Ok(ReleaseOutcome {
      version,
      tag,
      committed,
      sync: None,
    })
  }

  /// Bump, propagate, commit, push, tag
  fn run_new_release(&self, choice: &VersionChoice, policy: CommitPolicy) -> ShipResult<ReleaseOutcome> {
    let version = self.resolve_version(choice)?;
    let tag = self.ctx.config.git.tag_for(&version);
    self.sink.step(&format!("New release: {}", tag));

    self.sink.step(&format!("Writing version {} to manifests", version));
    let sync = self.store.propagate_all(&version)?;
    self.report_sync(&sync);

    self.sink.step("Staging changes");
    self.git.stage_all()?;

    let message = self.render(&self.ctx.config.git.release_message, &version);
    self.sink.step(&format!("Committing: {}", message));
    let committed = match policy {
      CommitPolicy::Strict => {
        self.git.commit(&message, Failure::Fatal)?;
        true
      }
      CommitPolicy::Tolerant => self.tolerate(self.git.commit(&message, Failure::Ignorable))?,
    };

    self.push_branch()?;
    self.create_and_push_tag(&tag, &version)?;

    self.sink.success(&format!("Released {}", tag));
    Ok(ReleaseOutcome {
      version,
      tag,
      committed,
      sync: Some(sync),
    })
  }

  /// Stage everything, commit if the tree is dirty, push the branch
  pub fn push_changes(&self) -> ShipResult<PushOutcome> {
    self.sink.step("Staging changes");
    self.git.stage_all()?;

    let committed = if self.git.has_uncommitted_changes()? {
      let template = &self.ctx.config.git.push_message;
      let version = if template.contains("{version}") {
        self.store.read_raw()?
      } else {
        String::new()
      };
      let message = self.render(template, &version);
      self.sink.step(&format!("Committing: {}", message));
      self.git.commit(&message, Failure::Fatal)?;
      true
    } else {
      self.sink.info("No new changes to commit, pushing existing commits");
      false
    };

    self.push_branch()?;
    Ok(PushOutcome {
      committed,
      remote: self.ctx.config.git.remote.clone(),
      branch: self.ctx.config.git.branch.clone(),
    })
  }

  /// Tag the current version and push the tag
  pub fn tag_current(&self) -> ShipResult<ReleaseOutcome> {
    let version = self.store.read_current()?.to_string();
    let tag = self.ctx.config.git.tag_for(&version);
    self.create_and_push_tag(&tag, &version)?;
    self.sink.success(&format!("Tagged {}", tag));
    Ok(ReleaseOutcome {
      version,
      tag,
      committed: false,
      sync: None,
    })
  }

  /// Version the current primary manifest holds, validated
  pub fn current_version(&self) -> ShipResult<Version> {
    Ok(self.store.read_current()?)
  }

  fn resolve_version(&self, choice: &VersionChoice) -> ShipResult<String> {
    match choice {
      VersionChoice::Explicit(requested) => Ok(Version::parse(requested)?.to_string()),
      VersionChoice::Increment => {
        let current = self.store.read_raw()?;
        let next = increment(&current);
        self.sink.info(&format!("Current version {} -> {}", current, next));
        Ok(next)
      }
    }
  }

  fn push_branch(&self) -> ShipResult<()> {
    let git = &self.ctx.config.git;
    self.sink.step(&format!("Pushing to {}/{}", git.remote, git.branch));
    self.git.push_branch(&git.remote, &git.branch)
  }

  fn create_and_push_tag(&self, tag: &str, version: &str) -> ShipResult<()> {
    self.sink.step(&format!("Creating tag {}", tag));
    self.git.create_tag(tag, &format!("Release {}", version))?;

    let remote = &self.ctx.config.git.remote;
    self.sink.step(&format!("Pushing tag {} to {}", tag, remote));
    self.git.push_tag(remote, tag)
  }

  fn report_sync(&self, report: &SyncReport) {
    for entry in &report.entries {
      let path = entry.path.display();
      match &entry.outcome {
        SyncOutcome::Updated { from, to } => {
          self.sink.info(&format!("{}: {} -> {}", path, from.as_deref().unwrap_or("(none)"), to))
        }
        SyncOutcome::Unchanged => self.sink.info(&format!("{}: already {}", path, report.version)),
        SyncOutcome::Missing => self.sink.warn(&format!("{}: file not found, skipped", path)),
        SyncOutcome::PatternNotFound => self.sink.warn(&format!(
          "{}: no version line in [{}], not updated",
          path, self.ctx.config.manifests.toml_section
        )),
      }
    }
  }

  /// Swallow ignorable command failures with a warning
  ///
  /// Returns `Ok(true)` if the step succeeded, `Ok(false)` if it failed but was
  /// ignorable, and the error otherwise.
  fn tolerate(&self, result: ShipResult<()>) -> ShipResult<bool> {
    match result {
      Ok(()) => Ok(true),
      Err(err) if err.is_ignorable() => {
        tracing::warn!(error = %err, "ignoring failed step");
        let detail = err.to_string().lines().last().unwrap_or_default().to_string();
        self.sink.warn(&format!("Ignored: {}", detail));
        Ok(false)
      }
      Err(err) => Err(err),
    }
  }

  fn render(&self, template: &str, version: &str) -> String {
    let timestamp = chrono::Local::now()
      .format(&self.ctx.config.git.timestamp_format)
      .to_string();
    template.replace("{version}", version).replace("{timestamp}", &timestamp)
  }
}
