use url::{ParseError, Url};

use crate::core::types::Page;

/// Resolve the base path against the site origin.
///
/// The returned root always ends with `/` so that page pathnames resolve
/// beneath it instead of replacing its last segment.
pub fn site_root(site: &Url, base: &str) -> Result<Url, ParseError> {
    let mut root = site.join(base)?;
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    Ok(root)
}

/// Absolute URL of every page, in page order.
///
/// Pathnames are always taken relative to the root, a leading `/` does not
/// escape the base path.
pub fn page_urls(root: &Url, pages: &[Page]) -> Result<Vec<Url>, ParseError> {
    pages
        .iter()
        .map(|page| root.join(page.pathname.trim_start_matches('/')))
        .collect()
}
