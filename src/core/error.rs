//! Error types for tagship with contextual messages and exit codes
//!
//! Every error belongs to one category (manifest, command, config, I/O) which
//! decides its exit code. Most categories can also suggest a next step to the
//! user via `help_message`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for tagship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, process, I/O)
  System = 2,
  /// Validation failure (malformed manifest or version)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for tagship
#[derive(Debug)]
pub enum ShipError {
  /// Manifest read/write errors
  Manifest(ManifestError),

  /// External command errors
  Command(CommandError),

  /// Configuration errors
  Config(ConfigError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(err) => ShipError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// True for a command failure the caller marked as expected to fail benignly
  pub fn is_ignorable(&self) -> bool {
    matches!(self, ShipError::Command(CommandError::Failed { ignorable: true, .. }))
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Manifest(ManifestError::Missing { .. }) => ExitCode::User,
      ShipError::Manifest(_) => ExitCode::Validation,
      ShipError::Command(_) => ExitCode::System,
      ShipError::Config(_) => ExitCode::User,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Manifest(e) => e.help_message(),
      ShipError::Command(e) => e.help_message(),
      ShipError::Config(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      ShipError::Io(_) => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Manifest(e) => write!(f, "{}", e),
      ShipError::Command(e) => write!(f, "{}", e),
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      ShipError::Command(CommandError::Spawn { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<ManifestError> for ShipError {
  fn from(err: ManifestError) -> Self {
    ShipError::Manifest(err)
  }
}

impl From<CommandError> for ShipError {
  fn from(err: CommandError) -> Self {
    ShipError::Command(err)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<toml_edit::ser::Error> for ShipError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ShipError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

/// Manifest (version store) errors
#[derive(Debug)]
pub enum ManifestError {
  /// Manifest file does not exist
  Missing { path: PathBuf },

  /// Manifest could not be parsed
  Malformed { path: PathBuf, reason: String },

  /// Manifest has no version key
  VersionMissing { path: PathBuf },

  /// Version string is not MAJOR.MINOR.PATCH
  InvalidVersion { version: String, reason: String },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::Missing { .. } => Some(
        "Run from the project root, pass --root, or point [manifests].primary in ship.toml at the right file."
          .to_string(),
      ),
      ManifestError::VersionMissing { .. } => Some("Add a \"version\": \"0.1.0\" entry to the manifest.".to_string()),
      ManifestError::InvalidVersion { .. } => Some("Versions must look like MAJOR.MINOR.PATCH, e.g. 1.4.2".to_string()),
      ManifestError::Malformed { .. } => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::Missing { path } => write!(f, "Manifest not found: {}", path.display()),
      ManifestError::Malformed { path, reason } => {
        write!(f, "Manifest could not be parsed: {}\n{}", path.display(), reason)
      }
      ManifestError::VersionMissing { path } => write!(f, "No version found in manifest: {}", path.display()),
      ManifestError::InvalidVersion { version, reason } => {
        write!(f, "Invalid version '{}': {}", version, reason)
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// Command ran and exited non-zero
  Failed {
    command: String,
    code: Option<i32>,
    stderr: String,
    /// Set by the caller for steps that are expected to fail sometimes
    ignorable: bool,
  },

  /// Command could not be started at all
  Spawn { command: String, source: io::Error },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::Failed { stderr, .. } => {
        if stderr.contains("non-fast-forward") || stderr.contains("fetch first") {
          Some("The remote has commits you don't have. Pull first, then run again.".to_string())
        } else if stderr.contains("nothing to commit") {
          Some("The working tree is clean. Use `tagship release --fix` to rebuild without a new commit.".to_string())
        } else if stderr.contains("already exists") {
          Some("The tag already exists. Use `tagship release --fix` to recreate it.".to_string())
        } else if stderr.contains("Permission denied") || stderr.contains("403") {
          Some("Check your SSH key or credentials for the remote.".to_string())
        } else {
          None
        }
      }
      CommandError::Spawn { command, .. } => Some(format!("Make sure `{}` is installed and on PATH.", command)),
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Failed {
        command, code, stderr, ..
      } => {
        match code {
          Some(code) => write!(f, "Command failed (exit {}): {}", code, command)?,
          None => write!(f, "Command failed: {}", command)?,
        }
        let stderr = stderr.trim();
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr)?;
        }
        Ok(())
      }
      CommandError::Spawn { command, source } => write!(f, "Failed to run {}: {}", command, source),
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// ship.toml exists but is not valid
  Invalid { path: PathBuf, reason: String },

  /// Refusing to overwrite an existing ship.toml
  AlreadyExists { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => Some("Run `tagship init --force` to regenerate a default ship.toml.".to_string()),
      ConfigError::AlreadyExists { .. } => Some("Pass --force to overwrite it.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::AlreadyExists { path } => write!(f, "Configuration already exists: {}", path.display()),
    }
  }
}

/// Result type alias for tagship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
