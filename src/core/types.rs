use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A page emitted by the site build.
///
/// The pathname is relative to the site root, e.g. `"post-1/"` for
/// `post-1/index.html` and `""` for the root index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Page {
    pub pathname: String,
}

impl Page {
    pub fn new<S: Into<String>>(pathname: S) -> Self {
        Self {
            pathname: pathname.into(),
        }
    }
}

/// Site settings resolved by the host before the build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    /// Deployed origin of the site; required for link creation
    pub site: Option<Url>,
    /// Base path the site is served under
    pub base: String,
}

impl Default for SiteContext {
    fn default() -> Self {
        Self {
            site: None,
            base: "/".to_string(),
        }
    }
}

impl SiteContext {
    pub fn new(site: Option<Url>, base: impl Into<String>) -> Self {
        Self {
            site,
            base: base.into(),
        }
    }
}

/// One page URL and the shortlink it should be reachable under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Absolute URL of the page
    pub page: String,
    /// Slug or path on the shortener domain
    pub shortlink: String,
}

impl PageLink {
    pub fn new(page: impl Into<String>, shortlink: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            shortlink: shortlink.into(),
        }
    }

    /// Shortlink with a single trailing slash removed.
    pub fn trimmed_shortlink(&self) -> &str {
        self.shortlink
            .strip_suffix('/')
            .unwrap_or(self.shortlink.as_str())
    }
}

pub type PageMapping = Vec<PageLink>;

/// A link reported back by the shortener after a batch sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedLink {
    pub key: String,
    pub shorturl: String,
    pub longurl: String,
}

impl fmt::Display for CreatedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.longurl)
    }
}

/// Result of a successful sync with the shortener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of links written
    pub created: usize,
    /// Links enumerated by the remote, empty when it does not report them
    pub entries: Vec<CreatedLink>,
}

/// Terminal state of one post-build run. None of these fail the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    InvalidConfig,
    MissingSite,
    MappingFailed,
    EmptyMapping,
    SyncFailed,
    Synced(SyncReport),
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced(_))
    }
}
