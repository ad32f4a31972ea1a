//! Integration tests for `tagship sync`

use crate::helpers::{CARGO_TOML, TAURI_CONF, TestProject, run_tagship, run_tagship_raw};
use anyhow::Result;

#[test]
fn test_sync_mirrors_primary_version() -> Result<()> {
  let project = TestProject::new()?;
  let package = project.read_file("package.json")?.replace("1.0.0", "1.3.0");
  project.write_file("package.json", &package)?;

  run_tagship(&project.path, &["sync"])?;

  assert_eq!(project.read_file("src-tauri/tauri.conf.json")?, TAURI_CONF.replace("1.0.0", "1.3.0"));
  assert_eq!(
    project.read_file("src-tauri/Cargo.toml")?,
    CARGO_TOML.replace("version = \"1.0.0\"", "version = \"1.3.0\"")
  );
  // tauri = { version = "2" } lives outside [package] and must survive
  assert!(project.read_file("src-tauri/Cargo.toml")?.contains("tauri = { version = \"2\""));

  Ok(())
}

#[test]
fn test_sync_explicit_version_is_idempotent() -> Result<()> {
  let project = TestProject::new()?;

  run_tagship(&project.path, &["sync", "2.0.0"])?;
  let first = (
    project.read_file("package.json")?,
    project.read_file("src-tauri/tauri.conf.json")?,
    project.read_file("src-tauri/Cargo.toml")?,
  );

  let output = run_tagship(&project.path, &["sync", "2.0.0", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["version"], "2.0.0");
  assert!(
    report["entries"]
      .as_array()
      .unwrap()
      .iter()
      .all(|e| e["status"] == "unchanged")
  );

  let second = (
    project.read_file("package.json")?,
    project.read_file("src-tauri/tauri.conf.json")?,
    project.read_file("src-tauri/Cargo.toml")?,
  );
  assert_eq!(first, second);

  Ok(())
}

#[test]
fn test_sync_missing_manifest_is_a_warning() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("src-tauri/tauri.conf.json"))?;

  let output = run_tagship(&project.path, &["sync", "1.0.5", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let statuses: Vec<&str> = report["entries"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["status"].as_str().unwrap())
    .collect();
  assert_eq!(statuses, vec!["updated", "missing", "updated"]);

  Ok(())
}

#[test]
fn test_sync_without_primary_fails() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("package.json"))?;

  let output = run_tagship_raw(&project.path, &["sync"], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Manifest not found"));

  Ok(())
}
