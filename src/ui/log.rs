//! User-facing progress lines
//!
//! Workflows never print directly; they emit `LogLine`s into a `LogSink`. The
//! console sink prints them, the GUI worker forwards them over its channel.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  /// A workflow step is starting
  Step,
  Info,
  Success,
  Warn,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
  pub level: LogLevel,
  pub message: String,
}

impl LogLine {
  pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
    Self {
      level,
      message: message.into(),
    }
  }
}

impl fmt::Display for LogLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let icon = match self.level {
      LogLevel::Step => "🔹",
      LogLevel::Info => "  ",
      LogLevel::Success => "✅",
      LogLevel::Warn => "⚠️ ",
      LogLevel::Error => "❌",
    };
    write!(f, "{} {}", icon, self.message)
  }
}

/// Destination for progress lines
pub trait LogSink: Send + Sync {
  fn emit(&self, line: LogLine);

  fn step(&self, message: &str) {
    self.emit(LogLine::new(LogLevel::Step, message));
  }

  fn info(&self, message: &str) {
    self.emit(LogLine::new(LogLevel::Info, message));
  }

  fn success(&self, message: &str) {
    self.emit(LogLine::new(LogLevel::Success, message));
  }

  fn warn(&self, message: &str) {
    self.emit(LogLine::new(LogLevel::Warn, message));
  }

  fn error(&self, message: &str) {
    self.emit(LogLine::new(LogLevel::Error, message));
  }
}

/// Prints to stdout, warnings and errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
  fn emit(&self, line: LogLine) {
    match line.level {
      LogLevel::Warn | LogLevel::Error => eprintln!("{}", line),
      _ => println!("{}", line),
    }
  }
}
