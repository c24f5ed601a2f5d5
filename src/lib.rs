//! Create shortlinks for the pages of a static site once its build is done.
//!
//! The [`WorkerLinks`] integration validates its options, turns the built
//! pages into absolute URLs, asks a [`PageMapper`] which shortlink each page
//! should get, and pushes the result to a link-shortener worker using one
//! of the [`sync`] protocols.

pub mod config;
pub mod core;
pub mod discovery;
pub mod integration;
pub mod mapping;
pub mod reporting;
pub mod sync;
pub mod ui;

// Re-export commonly used items for convenience
pub use crate::core::{
    ConfigValidationError, Issue, Page, PageLink, PageMapping, Result, SiteContext, SyncOutcome,
    SyncReport, WorkerLinksError,
};
pub use config::{Config, Options, OptionsSchema};
pub use integration::WorkerLinks;
pub use mapping::{PageMapper, from_fn, mapper_fn};
pub use sync::{LinkSync, Protocol};
