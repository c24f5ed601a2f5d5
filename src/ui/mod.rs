//! User interface and interaction
//!
//! This module contains CLI parsing, terminal colors and the status-line
//! logger.

pub mod cli;
pub mod color;
pub mod logger;

// Re-export commonly used items
pub use cli::{Cli, cli_to_config};
pub use logger::{Cause, CaptureBuffer, Logger};
