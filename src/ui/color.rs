//! Terminal color support for status lines

use std::env;
use std::io::IsTerminal;

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";

    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
}

/// Apply color to text if the terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_color() {
        format!("{color}{text}{}", Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Terminal capability detection for ANSI colors on stdout
pub fn supports_color() -> bool {
    let no_color = env::var("NO_COLOR").ok();
    let force_color = env::var("FORCE_COLOR").ok();
    if let Some(choice) = color_override(no_color.as_deref(), force_color.as_deref()) {
        return choice;
    }

    // Keep assertions on captured output free of escape codes
    if cfg!(test) || env::var("RUST_TEST_TIME_UNIT").is_ok() {
        return false;
    }

    if !std::io::stdout().is_terminal() {
        return false;
    }

    match env::var("TERM") {
        Ok(term) if term == "dumb" || term.is_empty() => false,
        Ok(_) => true,
        // Windows terminals usually leave TERM unset
        Err(_) => env::var("WT_SESSION").is_ok() || env::var("TERM_PROGRAM").is_ok(),
    }
}

/// Color choice forced by `NO_COLOR` / `FORCE_COLOR`, if any
fn color_override(no_color: Option<&str>, force_color: Option<&str>) -> Option<bool> {
    // Explicit opt-out wins over everything else
    if no_color.is_some() || force_color == Some("0") {
        return Some(false);
    }
    force_color.map(|_| true)
}
