//! Core building blocks for tagship
//!
//! - **config**: ship.toml parsing, defaults, and validation
//! - **context**: Project root, config, and command runner shared by every command
//! - **error**: Error types with exit codes and contextual help messages
//! - **process**: External command execution behind the `CommandRunner` seam
//! - **vcs**: Git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod vcs;
