//! Configuration management
//!
//! This module handles loading the TOML configuration file, merging it with
//! CLI arguments, and validating the plugin options found in it.

pub mod schema;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::core::constants::{config_files, package, timeouts};
use crate::core::error::{Result, WorkerLinksError};
use crate::core::types::SiteContext;
use crate::sync::HttpSettings;

pub use schema::{Options, OptionsSchema};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Deployed origin of the site, e.g. `https://example.com`
    pub site: Option<String>,

    /// Base path the site is served under
    pub base: Option<String>,

    /// Timeout in seconds for requests to the shortener
    pub timeout: Option<u64>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Plugin options; checked by [`OptionsSchema`] when the build is done
    pub options: Option<toml::Value>,
}

/// Configuration values coming from the command line
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config_file: Option<String>,
    pub no_config: bool,
    pub site: Option<String>,
    pub base: Option<String>,
    pub protocol: Option<String>,
    pub timeout: Option<u64>,
    pub verbose: bool,
}

impl Config {
    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            WorkerLinksError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            WorkerLinksError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Look for a config file in the current directory and its parents,
    /// falling back to defaults when there is none.
    pub fn load_from_standard_locations() -> Result<Self> {
        match Self::find_config_file(Path::new(".")) {
            Some(path) => {
                log::debug!("Using config file {}", path.display());
                Self::load_from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn find_config_file(start: &Path) -> Option<PathBuf> {
        (0..=config_files::PARENT_LEVELS)
            .map(|level| {
                let mut path = start.to_path_buf();
                for _ in 0..level {
                    path.push("..");
                }
                path.join(config_files::FILE_NAME)
            })
            .find(|path| path.is_file())
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref site) = cli_config.site {
            self.site = Some(site.clone());
        }
        if let Some(ref base) = cli_config.base {
            self.base = Some(base.clone());
        }
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }

        // The protocol belongs to the plugin options and is validated with them
        if let Some(ref protocol) = cli_config.protocol {
            match self.options {
                Some(toml::Value::Table(ref mut table)) => {
                    table.insert(
                        "protocol".to_string(),
                        toml::Value::String(protocol.clone()),
                    );
                }
                None => {
                    let mut table = toml::Table::new();
                    table.insert(
                        "protocol".to_string(),
                        toml::Value::String(protocol.clone()),
                    );
                    self.options = Some(toml::Value::Table(table));
                }
                // Leave malformed options alone so validation reports them
                Some(_) => {}
            }
        }
    }

    /// Site settings to hand to the integration once configuration is done.
    ///
    /// A blank `site` counts as unset.
    pub fn site_context(&self) -> Result<SiteContext> {
        let site = match self.site.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(site) => Some(Url::parse(site).map_err(|e| {
                WorkerLinksError::Config(format!("Invalid site URL '{site}': {e}"))
            })?),
            None => None,
        };

        Ok(SiteContext::new(site, self.base.as_deref().unwrap_or("/")))
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.timeout_duration(),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| package::USER_AGENT.to_string()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout
            && !(timeouts::MIN_TIMEOUT_SECONDS..=timeouts::MAX_TIMEOUT_SECONDS).contains(&timeout)
        {
            return Err(WorkerLinksError::Config(format!(
                "Timeout of {timeout} seconds is out of range. Expected {}-{} seconds.",
                timeouts::MIN_TIMEOUT_SECONDS,
                timeouts::MAX_TIMEOUT_SECONDS
            )));
        }

        if let Some(ref user_agent) = self.user_agent
            && user_agent.trim().is_empty()
        {
            return Err(WorkerLinksError::Config(
                "User agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
