use async_trait::async_trait;
use url::Url;

use super::{LinkSync, SyncError};
use crate::core::constants::headers;
use crate::core::types::{PageLink, SyncReport};

/// One `PUT <domain>/<shortlink>` per entry, sent one after the other.
///
/// The target page travels in the `URL` header. The first failing request
/// stops the run.
#[derive(Debug, Clone)]
pub struct PutSync {
    client: reqwest::Client,
    domain: Url,
    secret: String,
}

impl PutSync {
    pub fn new(client: reqwest::Client, domain: Url, secret: impl Into<String>) -> Self {
        Self {
            client,
            domain,
            secret: secret.into(),
        }
    }

    fn endpoint(&self, link: &PageLink) -> Result<Url, url::ParseError> {
        self.domain.join(link.trimmed_shortlink())
    }
}

#[async_trait]
impl LinkSync for PutSync {
    async fn sync(&self, mapping: &[PageLink]) -> Result<SyncReport, SyncError> {
        for link in mapping {
            let endpoint = self.endpoint(link)?;
            log::debug!("PUT {endpoint} -> {}", link.page);

            let response = self
                .client
                .put(endpoint)
                .header(headers::AUTHORIZATION, &self.secret)
                .header(headers::URL, &link.page)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(SyncError::from_response("PUT", response).await);
            }
        }

        Ok(SyncReport {
            created: mapping.len(),
            entries: Vec::new(),
        })
    }
}
