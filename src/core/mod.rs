//! Core types and foundational components
//!
//! This module contains the fundamental data types, error handling,
//! and constants used throughout the crate.

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items for convenience
pub use error::{ConfigValidationError, Issue, Result, WorkerLinksError};
pub use types::{CreatedLink, Page, PageLink, PageMapping, SiteContext, SyncOutcome, SyncReport};
