/// Application-wide constants to avoid magic values throughout the codebase.
///
/// Package identity
pub mod package {
    /// Name used as the prefix of every status line
    pub const NAME: &str = "worker-links";
    /// Default User-Agent header for requests to the shortener
    pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
}

/// Remote sync protocol names
pub mod protocols {
    /// One PUT request per mapping entry
    pub const PUT: &str = "put";
    /// A single POST with every mapping entry in a JSON body
    pub const BATCH: &str = "batch";

    /// Default protocol
    pub const DEFAULT: &str = BATCH;

    /// All valid protocols
    pub const ALL: [&str; 2] = [PUT, BATCH];
}

/// Built-in page mapper kinds
pub mod mapper_kinds {
    pub const PATH: &str = "path";
    pub const FILE: &str = "file";
    pub const COMMAND: &str = "command";

    pub const ALL: [&str; 3] = [PATH, FILE, COMMAND];
}

/// HTTP header names used by the shortener API
pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";
    /// Target page of a PUT request
    pub const URL: &str = "URL";
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
    /// Maximum reasonable timeout in seconds (1 hour)
    pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
    /// Minimum timeout in seconds
    pub const MIN_TIMEOUT_SECONDS: u64 = 1;
}

/// Configuration file lookup
pub mod config_files {
    /// File name searched in the current directory and its parents
    pub const FILE_NAME: &str = ".worker-links.toml";
    /// How many parent directories are searched
    pub const PARENT_LEVELS: usize = 3;
}
