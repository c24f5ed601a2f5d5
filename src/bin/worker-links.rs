use clap::Parser;
use worker_links::WorkerLinks;
use worker_links::config::{CliConfig, Config};
use worker_links::discovery::discover_pages;
use worker_links::reporting::logging;
use worker_links::ui::{Cli, cli_to_config};

use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Only setup problems fail the process, a skipped or failed sync does not
    match run_worker_links_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main post-build logic extracted from main() for testing
pub async fn run_worker_links_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    logging::init_logger(config.verbose.unwrap_or(false));
    logging::log_config_info(&config);

    let links =
        WorkerLinks::new(config.options.clone()).with_http_settings(config.http_settings());

    // Configuration is final at this point
    links.config_done(config.site_context()?);

    let dist = Path::new(&cli.dist);
    let pages = discover_pages(dist)?;
    logging::log_page_discovery(pages.len(), dist);

    let outcome = links.build_done(&pages).await?;
    log::debug!("Post-build run finished: {outcome:?}");

    Ok(0)
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file)?
    } else {
        Config::load_from_standard_locations()?
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}
