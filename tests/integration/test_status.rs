//! Integration tests for `tagship status`

use crate::helpers::{TestProject, run_tagship};
use anyhow::Result;

#[test]
fn test_status_json_in_sync() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_tagship(&project.path, &["status", "--json"])?;
  let status: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(status["current"], "1.0.0");
  assert_eq!(status["tag"], "v1.0.0");
  assert_eq!(status["in_sync"], true);
  assert_eq!(status["dirty"], false);
  assert_eq!(status["branch"], "main");
  assert_eq!(status["tagged"], false);
  assert_eq!(status["manifests"].as_array().unwrap().len(), 3);
  assert_eq!(status["manifests"][0]["primary"], true);

  Ok(())
}

#[test]
fn test_status_reports_drift_and_dirty_tree() -> Result<()> {
  let project = TestProject::new()?;
  let conf = project.read_file("src-tauri/tauri.conf.json")?.replace("1.0.0", "0.9.0");
  project.write_file("src-tauri/tauri.conf.json", &conf)?;

  let output = run_tagship(&project.path, &["status"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Manifests disagree"), "stdout: {}", stdout);
  assert!(stdout.contains("Uncommitted changes present"), "stdout: {}", stdout);

  Ok(())
}

#[test]
fn test_status_with_root_flag() -> Result<()> {
  let project = TestProject::new()?;
  let elsewhere = tempfile::TempDir::new()?;
  let root = project.path.to_string_lossy().to_string();

  let output = run_tagship(elsewhere.path(), &["--root", &root, "status", "--json"])?;
  let status: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(status["current"], "1.0.0");

  Ok(())
}
