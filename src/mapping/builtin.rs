//! Mapping functions that can be described in a configuration file

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use url::Url;

use super::{MapperResult, PageMapper};
use crate::core::types::{PageLink, PageMapping};

/// Declarative description of a built-in mapper, as found under
/// `options.page_mapping` in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperSpec {
    Path { prefix: Option<String> },
    File { path: PathBuf },
    Command { program: String, args: Vec<String> },
}

impl MapperSpec {
    pub fn into_mapper(self) -> Arc<dyn PageMapper> {
        match self {
            MapperSpec::Path { prefix } => Arc::new(PathMapper::new(prefix)),
            MapperSpec::File { path } => Arc::new(FileMapper::new(path)),
            MapperSpec::Command { program, args } => Arc::new(CommandMapper::new(program, args)),
        }
    }
}

/// Uses the page path relative to the site root as the shortlink,
/// optionally under a prefix.
///
/// Under the root `https://example.com/blog/`, the page
/// `https://example.com/blog/post-1/` maps to `post-1`, or to `p/post-1`
/// with the prefix `p`. The root page itself is left out. Without a root the
/// whole URL path is used.
#[derive(Debug, Clone, Default)]
pub struct PathMapper {
    prefix: Option<String>,
}

impl PathMapper {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    fn shortlink_for(&self, root_path: &str, url: &Url) -> Option<String> {
        let path = url.path();
        let relative = path
            .strip_prefix(root_path)
            .unwrap_or(path)
            .trim_matches('/');
        if relative.is_empty() {
            return None;
        }

        match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => Some(format!("{prefix}/{relative}")),
            _ => Some(relative.to_string()),
        }
    }

    fn mapping_under(&self, root_path: &str, pages: &[Url]) -> PageMapping {
        pages
            .iter()
            .filter_map(|url| {
                self.shortlink_for(root_path, url)
                    .map(|shortlink| PageLink::new(url.as_str(), shortlink))
            })
            .collect()
    }
}

#[async_trait]
impl PageMapper for PathMapper {
    async fn page_mapping(&self, pages: Vec<Url>) -> MapperResult {
        Ok(self.mapping_under("/", &pages))
    }

    async fn site_page_mapping(&self, root: &Url, pages: Vec<Url>) -> MapperResult {
        Ok(self.mapping_under(root.path(), &pages))
    }
}

/// Reads a table of `page path -> shortlink` from a TOML or JSON file.
///
/// Keys are compared with the page URL path with surrounding slashes
/// ignored, so `"/blog/post-1/"`, `"blog/post-1"` and `"blog/post-1/"` all
/// name the same page. Pages without an entry get no shortlink.
#[derive(Debug, Clone)]
pub struct FileMapper {
    path: PathBuf,
}

impl FileMapper {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> std::result::Result<BTreeMap<String, String>, super::BoxError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            format!(
                "Could not read page mapping file '{}': {e}",
                self.path.display()
            )
        })?;

        let is_json = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let table: BTreeMap<String, String> = if is_json {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };

        Ok(table
            .into_iter()
            .map(|(page, shortlink)| (page.trim_matches('/').to_string(), shortlink))
            .collect())
    }
}

#[async_trait]
impl PageMapper for FileMapper {
    async fn page_mapping(&self, pages: Vec<Url>) -> MapperResult {
        let table = self.load().await?;

        Ok(pages
            .iter()
            .filter_map(|url| {
                table
                    .get(url.path().trim_matches('/'))
                    .map(|shortlink| PageLink::new(url.as_str(), shortlink.as_str()))
            })
            .collect())
    }
}

/// Delegates the mapping to an external program.
///
/// The program receives one page URL per line on stdin and must print a
/// JSON array of `{"page": ..., "shortlink": ...}` objects on stdout.
#[derive(Debug, Clone)]
pub struct CommandMapper {
    program: String,
    args: Vec<String>,
}

impl CommandMapper {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl PageMapper for CommandMapper {
    async fn page_mapping(&self, pages: Vec<Url>) -> MapperResult {
        log::debug!("Running page mapping command: {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Could not start '{}': {e}", self.program))?;

        let input: String = pages.iter().map(|url| format!("{url}\n")).collect();
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            // stdin is dropped at the end of this block, so the program sees EOF
            match stdin.write_all(input.as_bytes()).await {
                // The program may finish without reading all of its input
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        // Output is drained while input is written, a program that streams
        // its answer must not block on a full stdout pipe
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            return Err(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )
            .into());
        }

        fed?;

        let mapping: PageMapping = serde_json::from_slice(&output.stdout)?;
        Ok(mapping)
    }
}
