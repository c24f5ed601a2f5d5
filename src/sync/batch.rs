use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use super::{LinkSync, SyncError};
use crate::core::constants::headers;
use crate::core::types::{CreatedLink, PageLink, SyncReport};

/// A single `POST <domain>` carrying `{ shortlink: page, ... }` as JSON.
#[derive(Debug, Clone)]
pub struct BatchSync {
    client: reqwest::Client,
    domain: Url,
    secret: String,
}

#[derive(Debug, Default, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    entries: Vec<CreatedLink>,
}

impl BatchSync {
    pub fn new(client: reqwest::Client, domain: Url, secret: impl Into<String>) -> Self {
        Self {
            client,
            domain,
            secret: secret.into(),
        }
    }

    /// Request body; a repeated shortlink keeps the last page given for it.
    pub fn body(mapping: &[PageLink]) -> Value {
        let links: Map<String, Value> = mapping
            .iter()
            .map(|link| {
                (
                    link.trimmed_shortlink().to_string(),
                    Value::String(link.page.clone()),
                )
            })
            .collect();
        Value::Object(links)
    }
}

#[async_trait]
impl LinkSync for BatchSync {
    async fn sync(&self, mapping: &[PageLink]) -> Result<SyncReport, SyncError> {
        let body = Self::body(mapping);
        log::debug!("POST {} with {} link(s)", self.domain, mapping.len());

        let response = self
            .client
            .post(self.domain.clone())
            .header(headers::AUTHORIZATION, &self.secret)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::from_response("POST", response).await);
        }

        let text = response.text().await?;
        let parsed = if text.trim().is_empty() {
            BatchResponse::default()
        } else {
            serde_json::from_str::<BatchResponse>(&text).unwrap_or_else(|err| {
                log::debug!("Unrecognized batch response ({err}): {text}");
                BatchResponse::default()
            })
        };

        let created = if parsed.entries.is_empty() {
            mapping.len()
        } else {
            parsed.entries.len()
        };

        Ok(SyncReport {
            created,
            entries: parsed.entries,
        })
    }
}
