//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const PACKAGE_JSON: &str = r#"{
  "name": "desktop-app",
  "private": true,
  "version": "1.0.0",
  "scripts": {
    "tauri": "tauri"
  }
}
"#;

pub const TAURI_CONF: &str = r#"{
  "productName": "Desktop App",
  "version": "1.0.0",
  "identifier": "com.example.desktop"
}
"#;

pub const CARGO_TOML: &str = r#"[package]
name = "desktop-app"
version = "1.0.0"
edition = "2021"

# keep this comment
[dependencies]
tauri = { version = "2", features = [] }
"#;

/// A Tauri-style project with a local bare `origin`
pub struct TestProject {
  _root: TempDir,
  _remote_root: TempDir,
  pub path: PathBuf,
  pub remote: PathBuf,
}

impl TestProject {
  /// Create the project, commit the manifests, and push `main` to origin
  pub fn new() -> Result<Self> {
    let remote_root = TempDir::new()?;
    let remote = remote_root.path().join("origin.git");
    git(remote_root.path(), &["init", "--bare", "--initial-branch=main", "origin.git"])?;

    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;

    std::fs::create_dir_all(path.join("src-tauri"))?;
    std::fs::write(path.join("package.json"), PACKAGE_JSON)?;
    std::fs::write(path.join("src-tauri/tauri.conf.json"), TAURI_CONF)?;
    std::fs::write(path.join("src-tauri/Cargo.toml"), CARGO_TOML)?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;
    git(&path, &["remote", "add", "origin", &remote.to_string_lossy()])?;
    git(&path, &["push", "origin", "main"])?;

    Ok(Self {
      _root: root,
      _remote_root: remote_root,
      path,
      remote,
    })
  }

  /// Write a file relative to the project root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Get git log subjects, newest first
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(stdout_lines(&output))
  }

  pub fn local_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(stdout_lines(&output))
  }

  /// Tags on origin, without the refs/tags/ prefix or peeled entries
  pub fn remote_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.remote, &["tag", "--list"])?;
    Ok(stdout_lines(&output))
  }

  /// Commit a tag points at in the remote
  pub fn remote_tag_commit(&self, tag: &str) -> Result<String> {
    let output = git(&self.remote, &["rev-list", "-n", "1", tag])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn remote_head(&self) -> Result<String> {
    let output = git(&self.remote, &["rev-parse", "main"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn local_head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

fn stdout_lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .map(|l| l.trim().to_string())
    .filter(|l| !l.is_empty())
    .collect()
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run tagship and return its output whatever the exit status
pub fn run_tagship_raw(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
  let mut child = Command::new(env!("CARGO_BIN_EXE_tagship"))
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run tagship")?;

  if let Some(mut input) = child.stdin.take() {
    input.write_all(stdin.as_bytes())?;
  }
  Ok(child.wait_with_output()?)
}

/// Run tagship CLI command, failing on a non-zero exit
pub fn run_tagship(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_tagship_raw(cwd, args, "")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "tagship command failed: tagship {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
