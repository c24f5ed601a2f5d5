//! Page discovery and URL derivation
//!
//! This module finds the pages of a finished build and turns their
//! pathnames into absolute URLs under the site root.

pub mod pages;
pub mod urls;

// Re-export commonly used items
pub use pages::discover_pages;
pub use urls::{page_urls, site_root};
