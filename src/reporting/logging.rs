use crate::config::Config;
use log::{debug, info};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Status lines are enough outside verbose mode
    };

    // A second init (tests, embedding hosts) keeps the first logger
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let site = config.site.as_deref().unwrap_or("<unset>");
    let base = config.base.as_deref().unwrap_or("/");
    let timeout = config.timeout_duration().as_secs();

    info!("Site: {site} (base {base})");
    info!("HTTP: timeout={timeout}s");
}

/// Log page discovery information
pub fn log_page_discovery(page_count: usize, dist: &Path) {
    info!("Found {page_count} page(s) in {}", dist.display());
}
