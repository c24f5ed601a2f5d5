use std::fmt;

/// A single violated field in the plugin options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Path from the options root to the offending field
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new<P, S>(path: &[P], message: S) -> Self
    where
        P: AsRef<str>,
        S: Into<String>,
    {
        Self {
            path: path.iter().map(|p| p.as_ref().to_string()).collect(),
            message: message.into(),
        }
    }

    /// Dotted field path, empty for the options root.
    pub fn field_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {}  {}.", self.field_path(), self.message)
    }
}

/// Every field-level problem found while validating the plugin options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub issues: Vec<Issue>,
}

impl ConfigValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Check whether a field (by dotted path) has at least one issue.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.field_path() == path)
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid config")?;
        for issue in &self.issues {
            write!(f, "\n{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

/// Error types for worker-links operations
#[derive(Debug)]
pub enum WorkerLinksError {
    /// IO error (file operations, child processes)
    Io(std::io::Error),

    /// Configuration file or CLI error
    Config(String),

    /// Plugin options failed schema validation
    InvalidConfig(ConfigValidationError),

    /// URL parsing or resolution error
    Url(url::ParseError),

    /// HTTP client error
    Http(reqwest::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON parsing error
    Json(serde_json::Error),

    /// Output directory traversal error
    PageDiscovery(ignore::Error),
}

impl fmt::Display for WorkerLinksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerLinksError::Io(err) => write!(f, "IO error: {err}"),
            WorkerLinksError::Config(msg) => write!(f, "Configuration error: {msg}"),
            WorkerLinksError::InvalidConfig(err) => write!(f, "{err}"),
            WorkerLinksError::Url(err) => write!(f, "URL error: {err}"),
            WorkerLinksError::Http(err) => write!(f, "HTTP error: {err}"),
            WorkerLinksError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            WorkerLinksError::Json(err) => write!(f, "JSON parsing error: {err}"),
            WorkerLinksError::PageDiscovery(err) => write!(f, "Page discovery error: {err}"),
        }
    }
}

impl std::error::Error for WorkerLinksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkerLinksError::Io(err) => Some(err),
            WorkerLinksError::InvalidConfig(err) => Some(err),
            WorkerLinksError::Url(err) => Some(err),
            WorkerLinksError::Http(err) => Some(err),
            WorkerLinksError::TomlParsing(err) => Some(err),
            WorkerLinksError::Json(err) => Some(err),
            WorkerLinksError::PageDiscovery(err) => Some(err),
            WorkerLinksError::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for WorkerLinksError {
    fn from(err: std::io::Error) -> Self {
        WorkerLinksError::Io(err)
    }
}

impl From<ConfigValidationError> for WorkerLinksError {
    fn from(err: ConfigValidationError) -> Self {
        WorkerLinksError::InvalidConfig(err)
    }
}

impl From<url::ParseError> for WorkerLinksError {
    fn from(err: url::ParseError) -> Self {
        WorkerLinksError::Url(err)
    }
}

impl From<reqwest::Error> for WorkerLinksError {
    fn from(err: reqwest::Error) -> Self {
        WorkerLinksError::Http(err)
    }
}

impl From<toml::de::Error> for WorkerLinksError {
    fn from(err: toml::de::Error) -> Self {
        WorkerLinksError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for WorkerLinksError {
    fn from(err: serde_json::Error) -> Self {
        WorkerLinksError::Json(err)
    }
}

impl From<ignore::Error> for WorkerLinksError {
    fn from(err: ignore::Error) -> Self {
        WorkerLinksError::PageDiscovery(err)
    }
}

/// Type alias for Results using WorkerLinksError
pub type Result<T> = std::result::Result<T, WorkerLinksError>;
