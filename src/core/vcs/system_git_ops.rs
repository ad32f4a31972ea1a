//! Write operations for SystemGit (stage, commit, push, tags)

use super::system_git::{Failure, SystemGit};
use crate::core::error::ShipResult;

impl SystemGit {
  /// Stage every change in the working tree, including deletions
  pub fn stage_all(&self) -> ShipResult<()> {
    self.exec(&["add", "--all"], Failure::Fatal)?;
    Ok(())
  }

  /// Commit the index with a message
  pub fn commit(&self, message: &str, failure: Failure) -> ShipResult<()> {
    self.exec(&["commit", "-m", message], failure)?;
    Ok(())
  }

  /// Push a branch to a remote
  pub fn push_branch(&self, remote: &str, branch: &str) -> ShipResult<()> {
    self.exec(&["push", remote, branch], Failure::Fatal)?;
    Ok(())
  }

  /// Create an annotated tag at HEAD
  pub fn create_tag(&self, tag: &str, message: &str) -> ShipResult<()> {
    self.exec(&["tag", "-a", tag, "-m", message], Failure::Fatal)?;
    Ok(())
  }

  /// Push a single tag to a remote
  pub fn push_tag(&self, remote: &str, tag: &str) -> ShipResult<()> {
    let refspec = format!("refs/tags/{}", tag);
    self.exec(&["push", remote, &refspec], Failure::Fatal)?;
    Ok(())
  }

  /// Delete a local tag
  pub fn delete_local_tag(&self, tag: &str, failure: Failure) -> ShipResult<()> {
    self.exec(&["tag", "-d", tag], failure)?;
    Ok(())
  }

  /// Delete a tag on a remote
  pub fn delete_remote_tag(&self, remote: &str, tag: &str, failure: Failure) -> ShipResult<()> {
    let refspec = format!("refs/tags/{}", tag);
    self.exec(&["push", "--delete", remote, &refspec], failure)?;
    Ok(())
  }

  /// Check whether a tag exists locally
  pub fn tag_exists(&self, tag: &str) -> ShipResult<bool> {
    let output = self.exec(&["tag", "--list", tag], Failure::Fatal)?;
    Ok(output.stdout.lines().any(|line| line.trim() == tag))
  }
}
