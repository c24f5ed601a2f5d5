// Command-line interface definitions and parsing for worker-links

use crate::config::CliConfig;
use crate::core::constants::protocols;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build output directory containing the generated pages
    pub dist: String,

    // Site
    /// Deployed origin of the site, e.g. https://example.com
    #[arg(long, value_name = "URL", help_heading = "Site")]
    pub site: Option<String>,

    /// Base path the site is served under (default: /)
    #[arg(long, value_name = "PATH", help_heading = "Site")]
    pub base: Option<String>,

    // Shortener
    /// Wire protocol used to create the links
    #[arg(long, value_name = "PROTOCOL", value_parser = protocols::ALL, help_heading = "Shortener")]
    pub protocol: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help_heading = "Shortener"
    )]
    pub timeout: Option<u64>,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,

    // Output
    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output")]
    pub verbose: bool,
}

/// Convert parsed CLI arguments into a [`CliConfig`] for merging
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        config_file: cli.config.clone(),
        no_config: cli.no_config,
        site: cli.site.clone(),
        base: cli.base.clone(),
        protocol: cli.protocol.clone(),
        timeout: cli.timeout,
        verbose: cli.verbose,
    }
}
