//! User interface: console log lines, prompts, and the optional GUI

#[cfg(feature = "gui")]
pub mod gui;
pub mod log;
pub mod prompt;
