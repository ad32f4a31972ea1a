//! Integration tests for `tagship push`

use crate::helpers::{TestProject, run_tagship, run_tagship_raw};
use anyhow::Result;

#[test]
fn test_push_commits_dirty_tree() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("notes.md", "# Notes\n")?;

  run_tagship(&project.path, &["push", "--no-tag"])?;

  let log = project.git_log(1)?;
  assert!(log[0].starts_with("Auto update: "), "unexpected commit: {}", log[0]);
  assert_eq!(project.remote_head()?, project.local_head()?);
  assert!(project.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_push_clean_tree_pushes_existing_commits() -> Result<()> {
  let project = TestProject::new()?;
  let before = project.git_log(5)?;

  let output = run_tagship(&project.path, &["push", "--no-tag"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("No new changes to commit"), "stdout: {}", stdout);
  assert_eq!(project.git_log(5)?, before);

  Ok(())
}

#[test]
fn test_push_with_tag_flag() -> Result<()> {
  let project = TestProject::new()?;

  run_tagship(&project.path, &["push", "--tag"])?;
  assert_eq!(project.remote_tags()?, vec!["v1.0.0"]);

  Ok(())
}

#[test]
fn test_push_prompt_answers() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_tagship_raw(&project.path, &["push"], "n\n")?;
  assert!(output.status.success());
  assert!(String::from_utf8_lossy(&output.stdout).contains("[y/N]"));
  assert!(project.remote_tags()?.is_empty());

  let output = run_tagship_raw(&project.path, &["push"], "y\n")?;
  assert!(output.status.success());
  assert_eq!(project.remote_tags()?, vec!["v1.0.0"]);

  Ok(())
}
