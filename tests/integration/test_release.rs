//! Integration tests for `tagship release`

use crate::helpers::{CARGO_TOML, TestProject, git, run_tagship, run_tagship_raw};
use anyhow::Result;

#[test]
fn test_release_explicit_version() -> Result<()> {
  let project = TestProject::new()?;

  run_tagship(&project.path, &["release", "1.1.0"])?;

  assert!(project.read_file("package.json")?.contains("\"version\": \"1.1.0\""));
  assert!(project.read_file("src-tauri/tauri.conf.json")?.contains("\"version\": \"1.1.0\""));
  assert_eq!(
    project.read_file("src-tauri/Cargo.toml")?,
    CARGO_TOML.replace("version = \"1.0.0\"", "version = \"1.1.0\"")
  );

  let log = project.git_log(1)?;
  assert!(log[0].starts_with("Release 1.1.0 ("), "unexpected commit: {}", log[0]);

  let head = project.local_head()?;
  assert_eq!(project.remote_head()?, head);
  assert_eq!(project.remote_tags()?, vec!["v1.1.0"]);
  assert_eq!(project.remote_tag_commit("v1.1.0")?, head);

  Ok(())
}

#[test]
fn test_release_auto_increment() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_tagship(&project.path, &["release"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("1.0.0 -> 1.0.1"), "stdout: {}", stdout);

  assert!(project.read_file("package.json")?.contains("\"version\": \"1.0.1\""));
  assert_eq!(project.remote_tags()?, vec!["v1.0.1"]);

  Ok(())
}

#[test]
fn test_release_accepts_v_prefix() -> Result<()> {
  let project = TestProject::new()?;

  run_tagship(&project.path, &["release", "v2.0.0"])?;
  assert!(project.read_file("package.json")?.contains("\"version\": \"2.0.0\""));
  assert_eq!(project.remote_tags()?, vec!["v2.0.0"]);

  Ok(())
}

#[test]
fn test_release_invalid_version_changes_nothing() -> Result<()> {
  let project = TestProject::new()?;
  let before = project.local_head()?;

  let output = run_tagship_raw(&project.path, &["release", "1.2"], "")?;
  assert_eq!(output.status.code(), Some(3));

  assert!(project.read_file("package.json")?.contains("\"version\": \"1.0.0\""));
  assert_eq!(project.local_head()?, before);
  assert!(project.local_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_fix_on_clean_tree_recreates_tag_without_commit() -> Result<()> {
  let project = TestProject::new()?;
  run_tagship(&project.path, &["release", "1.1.0"])?;
  let head = project.local_head()?;

  run_tagship(&project.path, &["release", "--fix"])?;

  assert_eq!(project.local_head()?, head, "fix mode must not commit a clean tree");
  assert_eq!(project.local_tags()?, vec!["v1.1.0"]);
  assert_eq!(project.remote_tags()?, vec!["v1.1.0"]);
  assert_eq!(project.remote_tag_commit("v1.1.0")?, head);

  Ok(())
}

#[test]
fn test_fix_without_existing_tag_tolerates_delete_failures() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_tagship(&project.path, &["release", "--fix"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Ignored"), "stderr: {}", stderr);

  assert_eq!(project.remote_tags()?, vec!["v1.0.0"]);
  assert_eq!(project.remote_tag_commit("v1.0.0")?, project.local_head()?);

  Ok(())
}

#[test]
fn test_fix_with_dirty_tree_moves_tag_to_new_commit() -> Result<()> {
  let project = TestProject::new()?;
  run_tagship(&project.path, &["release", "--fix"])?;
  let first = project.remote_tag_commit("v1.0.0")?;

  project.write_file("src/main.js", "console.log('patched');\n")?;
  run_tagship(&project.path, &["release", "--fix"])?;

  let log = project.git_log(1)?;
  assert!(log[0].starts_with("Rebuild 1.0.0 ("), "unexpected commit: {}", log[0]);

  let head = project.local_head()?;
  assert_ne!(head, first);
  assert_eq!(project.remote_head()?, head);
  assert_eq!(project.remote_tag_commit("v1.0.0")?, head);

  Ok(())
}

#[test]
fn test_failed_push_stops_before_tagging() -> Result<()> {
  let project = TestProject::new()?;
  git(&project.path, &["remote", "remove", "origin"])?;

  let output = run_tagship_raw(&project.path, &["release", "1.1.0"], "")?;
  assert_eq!(output.status.code(), Some(2));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("git"), "stderr: {}", stderr);
  assert!(project.local_tags()?.is_empty(), "no tag may be created after a failed push");

  Ok(())
}
