//! RTU Core - Backend logic for the RetroArch Thumbnail Updater
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be used by the CLI front-end or a future GUI shell.

pub mod config;
pub mod export;
pub mod logging;
pub mod matching;
pub mod models;
pub mod orchestrator;
pub mod playlist;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
