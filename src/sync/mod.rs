//! Remote synchronization with the link shortener
//!
//! The shortener API exists in two flavours, a PUT per link and a single
//! batch POST. Both sit behind [`LinkSync`] so the post-build flow does not
//! care which one is configured.

pub mod batch;
pub mod put;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::core::constants::{package, protocols, timeouts};
use crate::core::error::Result;
use crate::core::types::{PageLink, SyncReport};

pub use batch::BatchSync;
pub use put::PutSync;

#[async_trait]
pub trait LinkSync: Send + Sync {
    async fn sync(&self, mapping: &[PageLink]) -> std::result::Result<SyncReport, SyncError>;
}

/// Wire format used to talk to the shortener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    Put,
    #[default]
    Batch,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Put => protocols::PUT,
            Protocol::Batch => protocols::BATCH,
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            protocols::PUT => Ok(Protocol::Put),
            protocols::BATCH => Ok(Protocol::Batch),
            other => Err(format!(
                "Invalid enum value. Expected 'put' | 'batch', received '{other}'"
            )),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a sync with the shortener did not go through.
#[derive(Debug)]
pub enum SyncError {
    /// The request never produced a response
    Transport(reqwest::Error),
    /// The shortlink could not be turned into a URL on the shortener domain
    InvalidUrl(url::ParseError),
    /// The shortener answered with a non-success status
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
        /// Response body when it parsed as JSON
        data: Option<serde_json::Value>,
        body: String,
    },
}

impl SyncError {
    /// Structured error payload sent back by the shortener, if any.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            SyncError::Status { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    pub(crate) async fn from_response(method: &'static str, response: reqwest::Response) -> Self {
        let url = response.url().to_string();
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let data = serde_json::from_str::<serde_json::Value>(&body).ok();

        SyncError::Status {
            method,
            url,
            status,
            data,
            body,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Transport(err) => write!(f, "Request failed: {err}"),
            SyncError::InvalidUrl(err) => write!(f, "Invalid shortlink URL: {err}"),
            SyncError::Status {
                method,
                url,
                status,
                body,
                ..
            } => {
                write!(f, "[{method}] \"{url}\": {status}")?;
                if !body.is_empty() {
                    write!(f, " {body}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Transport(err) => Some(err),
            SyncError::InvalidUrl(err) => Some(err),
            SyncError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err)
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err)
    }
}

/// HTTP client settings shared by both protocols
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(timeouts::DEFAULT_TIMEOUT_SECONDS),
            user_agent: package::USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?;
        Ok(client)
    }
}
