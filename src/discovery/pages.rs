use std::path::{Component, Path};

use crate::core::error::{Result, WorkerLinksError};
use crate::core::types::Page;

const HTML_EXTENSION: &str = "html";
const INDEX_FILE: &str = "index.html";

/// Collect the pages of a finished build from its output directory.
///
/// `post-1/index.html` becomes `"post-1/"`, the root `index.html` becomes
/// `""` and any other `about.html` becomes `"about"`. Pages are returned in
/// file-name order so repeated runs see the same mapping input.
pub fn discover_pages(dist: &Path) -> Result<Vec<Page>> {
    if !dist.is_dir() {
        return Err(WorkerLinksError::Config(format!(
            "'{}' is not a directory",
            dist.display()
        )));
    }

    let mut builder = ignore::WalkBuilder::new(dist);
    // Build output is usually gitignored, so ignore files must not apply here
    builder
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut pages = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(HTML_EXTENSION) {
            continue;
        }

        if let Ok(relative) = path.strip_prefix(dist) {
            pages.push(Page::new(pathname_for(relative)));
        }
    }

    log::debug!("Discovered {} page(s) in {}", pages.len(), dist.display());
    Ok(pages)
}

fn pathname_for(relative: &Path) -> String {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    match segments.split_last() {
        Some((file, dirs)) if file == INDEX_FILE => dirs
            .iter()
            .map(|d| format!("{d}/"))
            .collect::<String>(),
        Some((file, dirs)) => {
            let stem = file
                .strip_suffix(".html")
                .unwrap_or(file.as_str())
                .to_string();
            let mut parts = dirs.to_vec();
            parts.push(stem);
            parts.join("/")
        }
        None => String::new(),
    }
}
