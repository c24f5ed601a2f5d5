//! Post-build link synchronization
//!
//! [`WorkerLinks`] is driven by the host build through two hooks:
//! [`config_done`](WorkerLinks::config_done) once the site configuration is
//! final, then [`build_done`](WorkerLinks::build_done) with the pages that
//! were emitted. Every expected failure along the way is logged and turned
//! into a [`SyncOutcome`]; only errors that point at a broken setup are
//! returned to the host.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::schema::OptionsSchema;
use crate::core::constants::package;
use crate::core::error::{Result, WorkerLinksError};
use crate::core::types::{Page, SiteContext, SyncOutcome, SyncReport};
use crate::discovery::{page_urls, site_root};
use crate::mapping::PageMapper;
use crate::sync::{HttpSettings, SyncError};
use crate::ui::logger::{Cause, Logger};

pub struct WorkerLinks {
    raw_options: Option<toml::Value>,
    mapper: Option<Arc<dyn PageMapper>>,
    http: HttpSettings,
    site: OnceCell<SiteContext>,
    logger: Logger,
}

impl WorkerLinks {
    /// Integration for the given raw options; they are validated when the
    /// build is done, not here.
    pub fn new(raw_options: Option<toml::Value>) -> Self {
        Self {
            raw_options,
            mapper: None,
            http: HttpSettings::default(),
            site: OnceCell::new(),
            logger: Logger::new(package::NAME),
        }
    }

    /// Use a mapping function from code instead of `page_mapping` in the options.
    pub fn with_page_mapper<M>(mut self, mapper: M) -> Self
    where
        M: PageMapper + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    pub fn with_http_settings(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn name(&self) -> &str {
        package::NAME
    }

    /// Capture the final site configuration. Only the first call counts.
    pub fn config_done(&self, site: SiteContext) {
        if self.site.set(site).is_err() {
            log::debug!("Site configuration already captured, ignoring update");
        }
    }

    /// Create shortlinks for the pages of a finished build.
    pub async fn build_done(&self, pages: &[Page]) -> Result<SyncOutcome> {
        let options = match OptionsSchema::parse(self.raw_options.as_ref(), self.mapper.clone()) {
            Ok(options) => options,
            Err(WorkerLinksError::InvalidConfig(err)) => {
                self.logger.error(&err.to_string(), None);
                return Ok(SyncOutcome::InvalidConfig);
            }
            Err(other) => return Err(other),
        };

        let Some((site, base)) = self
            .site
            .get()
            .and_then(|ctx| ctx.site.as_ref().map(|site| (site, ctx.base.as_str())))
        else {
            self.logger.warn("requires the `site` option. Skipping.");
            return Ok(SyncOutcome::MissingSite);
        };

        self.logger
            .info(&format!("Creating worker links on {}", options.domain.as_str()));

        let root = site_root(site, base)?;
        let urls = page_urls(&root, pages)?;
        log::debug!("Derived {} page URL(s) under {root}", urls.len());

        let mapping = match options.page_mapping.site_page_mapping(&root, urls).await {
            Ok(mapping) => mapping,
            Err(err) => {
                self.logger.error(
                    "Error while getting page mapping:",
                    Some(Cause::Error(err.as_ref())),
                );
                return Ok(SyncOutcome::MappingFailed);
            }
        };

        if mapping.is_empty() {
            self.logger.warn("Empty page mapping generated. Skipping");
            return Ok(SyncOutcome::EmptyMapping);
        }

        let link_sync = options.link_sync(&self.http)?;
        log::debug!(
            "Syncing {} link(s) using the {} protocol",
            mapping.len(),
            options.protocol
        );

        match link_sync.sync(&mapping).await {
            Ok(report) => {
                self.logger.success(&success_message(&report));
                Ok(SyncOutcome::Synced(report))
            }
            Err(err) => {
                self.log_sync_error(&err);
                Ok(SyncOutcome::SyncFailed)
            }
        }
    }

    fn log_sync_error(&self, err: &SyncError) {
        const MESSAGE: &str = "Failed to create worker links:";

        match err.data().map(serde_json::to_string_pretty) {
            Some(Ok(pretty)) => self.logger.error(MESSAGE, Some(Cause::Value(pretty))),
            _ => self.logger.error(MESSAGE, Some(Cause::Error(err))),
        }
    }
}

fn success_message(report: &SyncReport) -> String {
    let mut message = format!("Created {} worker links!", report.created);
    for entry in &report.entries {
        message.push_str(&format!("\n  {entry}"));
    }
    message
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::{CreatedLink, PageLink, PageMapping};
    use crate::mapping::{BoxError, from_fn, mapper_fn};
    use crate::ui::logger::CaptureBuffer;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use url::Url;

    fn options(domain: &str, protocol: &str) -> toml::Value {
        toml::Value::Table(
            toml::from_str(&format!(
                "domain = \"{domain}\"\nsecret = \"s3cret\"\nprotocol = \"{protocol}\""
            ))
            .unwrap(),
        )
    }

    fn integration(raw: Option<toml::Value>) -> (WorkerLinks, CaptureBuffer) {
        let buffer = CaptureBuffer::new();
        let links =
            WorkerLinks::new(raw).with_logger(Logger::with_writer(package::NAME, buffer.clone()));
        (links, buffer)
    }

    fn example_site() -> SiteContext {
        SiteContext::new(Some(Url::parse("https://example.com").unwrap()), "/blog/")
    }

    fn slug_mapper() -> impl PageMapper {
        from_fn(|pages: Vec<Url>| {
            Ok(pages
                .iter()
                .map(|url| PageLink::new(url.as_str(), format!("{}/", url.path().trim_matches('/'))))
                .collect())
        })
    }

    #[tokio::test]
    async fn test_build_done__invalid_config_is_logged_not_returned() {
        let mut server = Server::new_async().await;
        let post = server.mock("POST", Matcher::Any).expect(0).create_async().await;
        let put = server.mock("PUT", Matcher::Any).expect(0).create_async().await;
        let raw = toml::Value::Table(
            toml::from_str(&format!(
                "domain = \"{}\"\nsecret = 42\npage_mapping = {{ kind = \"path\" }}",
                server.url()
            ))
            .unwrap(),
        );
        let (links, buffer) = integration(Some(raw));
        links.config_done(example_site());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        post.assert_async().await;
        put.assert_async().await;
        assert_eq!(outcome, SyncOutcome::InvalidConfig);
        assert_eq!(
            buffer.contents(),
            "worker-links: Invalid config\n secret  Expected string, received integer.\n"
        );
    }

    #[tokio::test]
    async fn test_build_done__every_issue_is_reported() {
        let raw = toml::Value::Table(toml::from_str("page_mapping = 3").unwrap());
        let (links, buffer) = integration(Some(raw));
        links.config_done(example_site());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        assert_eq!(outcome, SyncOutcome::InvalidConfig);
        assert_eq!(
            buffer.contents(),
            "worker-links: Invalid config\n domain  Required.\n secret  Required.\n page_mapping  Expected function, received integer.\n"
        );
    }

    #[tokio::test]
    async fn test_build_done__path_mapping_is_relative_to_base() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!({
                "post-1": "https://example.com/blog/post-1/"
            })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let raw = toml::Value::Table(
            toml::from_str(&format!(
                "domain = \"{}\"\nsecret = \"s3cret\"\npage_mapping = {{ kind = \"path\" }}",
                server.url()
            ))
            .unwrap(),
        );
        let (links, buffer) = integration(Some(raw));
        links.config_done(example_site());

        let outcome = links
            .build_done(&[Page::new("/"), Page::new("post-1/")])
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(
            outcome,
            SyncOutcome::Synced(SyncReport {
                created: 1,
                entries: Vec::new()
            })
        );
        assert!(buffer.contents().ends_with("worker-links: Created 1 worker links!\n"));
    }

    #[tokio::test]
    async fn test_build_done__missing_site_warns() {
        let (links, buffer) = integration(Some(options("https://s.to", "batch")));
        let links = links.with_page_mapper(slug_mapper());
        links.config_done(SiteContext::default());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        assert_eq!(outcome, SyncOutcome::MissingSite);
        assert_eq!(
            buffer.contents(),
            "worker-links: requires the `site` option. Skipping.\n"
        );
    }

    #[tokio::test]
    async fn test_build_done__without_config_done_warns() {
        let (links, _buffer) = integration(Some(options("https://s.to", "batch")));
        let links = links.with_page_mapper(slug_mapper());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        assert_eq!(outcome, SyncOutcome::MissingSite);
    }

    #[tokio::test]
    async fn test_config_done__first_capture_wins() {
        let (links, _buffer) = integration(Some(options("https://s.to", "batch")));
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let links = links.with_page_mapper(from_fn(move |pages: Vec<Url>| {
            recorder.lock().unwrap().extend(pages);
            Ok(Vec::new())
        }));

        links.config_done(example_site());
        links.config_done(SiteContext::new(
            Some(Url::parse("https://other.example").unwrap()),
            "/",
        ));
        links.build_done(&[Page::new("/post-1/")]).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].as_str(), "https://example.com/blog/post-1/");
    }

    #[tokio::test]
    async fn test_build_done__mapping_error_is_contained() {
        let (links, buffer) = integration(Some(options("https://s.to", "batch")));
        let links = links.with_page_mapper(mapper_fn(|_pages: Vec<Url>| async {
            Err::<PageMapping, _>(BoxError::from("lookup table unavailable"))
        }));
        links.config_done(example_site());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        assert_eq!(outcome, SyncOutcome::MappingFailed);
        let out = buffer.contents();
        assert!(out.contains("worker-links: Error while getting page mapping:\nlookup table unavailable"));
    }

    #[tokio::test]
    async fn test_build_done__empty_mapping_skips_remote() {
        let mut server = Server::new_async().await;
        let m = server.mock("POST", Matcher::Any).expect(0).create_async().await;
        let (links, buffer) = integration(Some(options(&server.url(), "batch")));
        let links = links.with_page_mapper(from_fn(|_| Ok(Vec::new())));
        links.config_done(example_site());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        m.assert_async().await;
        assert_eq!(outcome, SyncOutcome::EmptyMapping);
        assert!(buffer
            .contents()
            .ends_with("worker-links: Empty page mapping generated. Skipping\n"));
    }

    #[tokio::test]
    async fn test_build_done__put_protocol() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/blog/post-1")
            .match_header("authorization", "s3cret")
            .match_header("url", "https://example.com/blog/post-1/")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let (links, buffer) = integration(Some(options(&server.url(), "put")));
        let links = links.with_page_mapper(slug_mapper());
        links.config_done(SiteContext::new(Some(Url::parse("https://example.com").unwrap()), "/"));

        let outcome = links.build_done(&[Page::new("blog/post-1/")]).await.unwrap();

        m.assert_async().await;
        assert_eq!(
            outcome,
            SyncOutcome::Synced(SyncReport {
                created: 1,
                entries: Vec::new()
            })
        );
        assert!(buffer.contents().ends_with("worker-links: Created 1 worker links!\n"));
    }

    #[tokio::test]
    async fn test_build_done__batch_protocol_lists_entries() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!({
                "post-1": "https://example.com/blog/post-1/",
                "post-2": "https://example.com/blog/post-2/"
            })))
            .with_status(200)
            .with_body(
                json!({"entries": [
                    {"key": "post-1", "shorturl": "https://s.to/post-1", "longurl": "https://example.com/blog/post-1/"},
                    {"key": "post-2", "shorturl": "https://s.to/post-2", "longurl": "https://example.com/blog/post-2/"}
                ]})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let mapper = from_fn(|pages: Vec<Url>| {
            Ok(pages
                .iter()
                .map(|url| {
                    let slug = url.path().trim_matches('/').trim_start_matches("blog/");
                    PageLink::new(url.as_str(), format!("{slug}/"))
                })
                .collect())
        });
        let (links, buffer) = integration(Some(options(&server.url(), "batch")));
        let links = links.with_page_mapper(mapper);
        links.config_done(example_site());

        let outcome = links
            .build_done(&[Page::new("post-1/"), Page::new("post-2/")])
            .await
            .unwrap();

        m.assert_async().await;
        match outcome {
            SyncOutcome::Synced(report) => {
                assert_eq!(report.created, 2);
                assert_eq!(
                    report.entries[0],
                    CreatedLink {
                        key: "post-1".to_string(),
                        shorturl: "https://s.to/post-1".to_string(),
                        longurl: "https://example.com/blog/post-1/".to_string(),
                    }
                );
            }
            other => panic!("expected a synced outcome, got {other:?}"),
        }
        assert!(buffer.contents().ends_with(
            "worker-links: Created 2 worker links!\n  post-1 -> https://example.com/blog/post-1/\n  post-2 -> https://example.com/blog/post-2/\n"
        ));
    }

    #[tokio::test]
    async fn test_build_done__remote_rejection_logs_pretty_data() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"reason":"conflict"}"#)
            .create_async()
            .await;
        let (links, buffer) = integration(Some(options(&server.url(), "batch")));
        let links = links.with_page_mapper(slug_mapper());
        links.config_done(example_site());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        assert_eq!(outcome, SyncOutcome::SyncFailed);
        assert!(buffer.contents().contains(
            "worker-links: Failed to create worker links:\n{\n  \"reason\": \"conflict\"\n}\n"
        ));
    }

    #[tokio::test]
    async fn test_build_done__transport_error_logs_raw_error() {
        let (links, buffer) = integration(Some(options("http://127.0.0.1:1", "put")));
        let links = links.with_page_mapper(slug_mapper());
        links.config_done(example_site());

        let outcome = links.build_done(&[Page::new("a/")]).await.unwrap();

        assert_eq!(outcome, SyncOutcome::SyncFailed);
        assert!(buffer
            .contents()
            .contains("worker-links: Failed to create worker links:\nRequest failed:"));
    }

    #[tokio::test]
    async fn test_build_done__malformed_pathname_propagates() {
        let (links, _buffer) = integration(Some(options("https://s.to", "batch")));
        let links = links.with_page_mapper(slug_mapper());
        links.config_done(example_site());

        let result = links.build_done(&[Page::new("http://[broken")]).await;

        assert!(matches!(result, Err(WorkerLinksError::Url(_))));
    }

    #[test]
    fn test_name() {
        assert_eq!(WorkerLinks::new(None).name(), "worker-links");
    }
}
