//! CLI commands for tagship
//!
//! ## Release
//! - **release**: new release (explicit or auto-incremented version) or fix-mode rebuild
//! - **push**: stage, commit if dirty, push, optionally tag the current version
//!
//! ## Versions
//! - **sync**: propagate a version into every manifest without touching git
//! - **status**: show the version each manifest holds and whether they agree
//!
//! ## Setup & Tools
//! - **init**: write a default ship.toml
//! - **dev**: run the dev server with port cleanup around it
//! - **gui**: graphical release front-end (`gui` feature)
//!
//! All commands except `init` accept `&ProjectContext` to avoid redundant config loads.

pub mod dev;
pub mod gui;
pub mod init;
pub mod push;
pub mod release;
pub mod status;
pub mod sync;

pub use dev::run_dev;
pub use gui::run_gui;
pub use init::run_init;
pub use push::run_push;
pub use release::run_release;
pub use status::run_status;
pub use sync::run_sync;
