//! Integration tests for `tagship init` and ship.toml handling

use crate::helpers::{TestProject, run_tagship, run_tagship_raw};
use anyhow::Result;

#[test]
fn test_init_writes_config_once() -> Result<()> {
  let project = TestProject::new()?;

  run_tagship(&project.path, &["init"])?;
  let config = project.read_file("ship.toml")?;
  assert!(config.contains("[manifests]"));
  assert!(config.contains("tag_prefix = \"v\""));

  let output = run_tagship_raw(&project.path, &["init"], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));

  run_tagship(&project.path, &["init", "--force"])?;
  Ok(())
}

#[test]
fn test_custom_tag_prefix_and_messages() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(
    "ship.toml",
    "[git]\ntag_prefix = \"app-v\"\nrelease_message = \"chore: release {version}\"\n",
  )?;

  run_tagship(&project.path, &["release", "1.0.1"])?;

  assert_eq!(project.git_log(1)?, vec!["chore: release 1.0.1"]);
  assert_eq!(project.remote_tags()?, vec!["app-v1.0.1"]);
  Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("ship.toml", "[git]\nrelease_message = \"Release {tag}\"\n")?;

  let output = run_tagship_raw(&project.path, &["status"], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("{tag}"));
  Ok(())
}
