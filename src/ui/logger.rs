//! Leveled status lines prefixed with the package name
//!
//! These are the user-facing messages of a post-build run. Developer
//! diagnostics go through the `log` facade instead (see
//! [`crate::reporting::logging`]).

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::ui::color::{Colors, colorize};

/// Extra detail attached to an error line.
pub enum Cause<'a> {
    /// An error value, printed with its source chain
    Error(&'a dyn Error),
    /// Any other value, printed as is
    Value(String),
}

impl fmt::Display for Cause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(err) => {
                write!(f, "{err}")?;
                let mut source = err.source();
                while let Some(inner) = source {
                    write!(f, "\nCaused by: {inner}")?;
                    source = inner.source();
                }
                Ok(())
            }
            Cause::Value(value) => write!(f, "{value}"),
        }
    }
}

pub struct Logger {
    package_name: String,
    out: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("package_name", &self.package_name)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Logger writing to stdout
    pub fn new(package_name: impl Into<String>) -> Self {
        Self::with_writer(package_name, io::stdout())
    }

    pub fn with_writer<W>(package_name: impl Into<String>, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            package_name: package_name.into(),
            out: Mutex::new(Box::new(writer)),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn info(&self, msg: &str) {
        self.log(msg, Colors::BLUE, true);
    }

    pub fn success(&self, msg: &str) {
        self.log(msg, Colors::GREEN, true);
    }

    pub fn warn(&self, msg: &str) {
        self.log(msg, Colors::YELLOW, false);
    }

    pub fn error(&self, msg: &str, cause: Option<Cause<'_>>) {
        match cause {
            Some(cause) => self.log(&format!("{msg}\n{cause}"), Colors::RED, false),
            None => self.log(msg, Colors::RED, false),
        }
    }

    fn log(&self, msg: &str, color: &str, color_only_name: bool) {
        let name = colorize(&format!("{}:", self.package_name), color);
        let body = if color_only_name {
            msg.to_string()
        } else {
            colorize(msg, color)
        };

        if let Ok(mut out) = self.out.lock() {
            // Write failures never fail the build
            let _ = writeln!(out, "{name} {body}");
            let _ = out.flush();
        }
    }
}

/// In-memory sink for a [`Logger`], cloneable so the lines can be read back.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
