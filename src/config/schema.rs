//! Validation of the plugin options
//!
//! The options arrive as an untyped TOML value (or nothing at all), so every
//! field is checked by hand and all problems are reported together.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use toml::Value;
use url::Url;

use crate::core::constants::mapper_kinds;
use crate::core::error::{ConfigValidationError, Issue, Result};
use crate::mapping::{MapperSpec, PageMapper};
use crate::sync::{BatchSync, HttpSettings, LinkSync, Protocol, PutSync};

const REQUIRED: &str = "Required";
const INVALID_URL: &str = "Invalid url";

/// Plugin options after validation.
#[derive(Clone)]
pub struct Options {
    pub domain: Url,
    pub secret: String,
    pub page_mapping: Arc<dyn PageMapper>,
    pub protocol: Protocol,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("domain", &self.domain.as_str())
            .field("secret", &"<redacted>")
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

impl Options {
    /// Sync strategy for the configured protocol.
    pub fn link_sync(&self, http: &HttpSettings) -> Result<Box<dyn LinkSync>> {
        let client = http.build_client()?;
        let sync: Box<dyn LinkSync> = match self.protocol {
            Protocol::Put => Box::new(PutSync::new(
                client,
                self.domain.clone(),
                self.secret.clone(),
            )),
            Protocol::Batch => Box::new(BatchSync::new(
                client,
                self.domain.clone(),
                self.secret.clone(),
            )),
        };
        Ok(sync)
    }
}

pub struct OptionsSchema;

impl OptionsSchema {
    /// Validate raw options.
    ///
    /// A mapper supplied in code takes the place of `page_mapping` in the
    /// raw value. Failures come back as
    /// [`WorkerLinksError::InvalidConfig`](crate::core::error::WorkerLinksError::InvalidConfig)
    /// with one issue per broken field.
    pub fn parse(raw: Option<&Value>, mapper: Option<Arc<dyn PageMapper>>) -> Result<Options> {
        let table = match raw {
            None => {
                return Err(ConfigValidationError::new(vec![Issue::new::<&str, _>(
                    &[],
                    REQUIRED,
                )])
                .into());
            }
            Some(Value::Table(table)) => table,
            Some(other) => {
                return Err(ConfigValidationError::new(vec![Issue::new::<&str, _>(
                    &[],
                    format!("Expected object, received {}", received(other)),
                )])
                .into());
            }
        };

        let mut issues = Vec::new();

        let domain = required_string(table.get("domain"), &["domain"], &mut issues).and_then(
            |domain| match parse_absolute_url(domain) {
                Some(url) => Some(url),
                None => {
                    issues.push(Issue::new(&["domain"], INVALID_URL));
                    None
                }
            },
        );

        let secret = required_string(table.get("secret"), &["secret"], &mut issues);

        let page_mapping = match mapper {
            Some(mapper) => Some(mapper),
            None => mapper_spec(table.get("page_mapping"), &mut issues).map(MapperSpec::into_mapper),
        };

        let protocol = match table.get("protocol") {
            None => Some(Protocol::default()),
            Some(Value::String(s)) => match s.parse::<Protocol>() {
                Ok(protocol) => Some(protocol),
                Err(message) => {
                    issues.push(Issue::new(&["protocol"], message));
                    None
                }
            },
            Some(other) => {
                issues.push(Issue::new(&["protocol"], expected("string", other)));
                None
            }
        };

        match (domain, secret, page_mapping, protocol) {
            (Some(domain), Some(secret), Some(page_mapping), Some(protocol)) if issues.is_empty() => {
                Ok(Options {
                    domain,
                    secret: secret.to_string(),
                    page_mapping,
                    protocol,
                })
            }
            _ => Err(ConfigValidationError::new(issues).into()),
        }
    }
}

/// Parse a URL that has a scheme and a host.
fn parse_absolute_url(input: &str) -> Option<Url> {
    Url::parse(input).ok().filter(Url::has_host)
}

fn received(value: &Value) -> &'static str {
    match value {
        Value::Table(_) => "object",
        other => other.type_str(),
    }
}

fn expected(kind: &str, value: &Value) -> String {
    format!("Expected {kind}, received {}", received(value))
}

fn required_string<'a>(
    value: Option<&'a Value>,
    path: &[&str],
    issues: &mut Vec<Issue>,
) -> Option<&'a str> {
    match value {
        None => {
            issues.push(Issue::new(path, REQUIRED));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            issues.push(Issue::new(path, expected("string", other)));
            None
        }
    }
}

fn optional_string<'a>(
    value: Option<&'a Value>,
    path: &[&str],
    issues: &mut Vec<Issue>,
) -> Option<Option<&'a str>> {
    match value {
        None => Some(None),
        Some(Value::String(s)) => Some(Some(s.as_str())),
        Some(other) => {
            issues.push(Issue::new(path, expected("string", other)));
            None
        }
    }
}

fn mapper_spec(value: Option<&Value>, issues: &mut Vec<Issue>) -> Option<MapperSpec> {
    let table = match value {
        None => {
            issues.push(Issue::new(&["page_mapping"], REQUIRED));
            return None;
        }
        Some(Value::Table(table)) => table,
        Some(other) => {
            issues.push(Issue::new(&["page_mapping"], expected("function", other)));
            return None;
        }
    };

    let kind = required_string(table.get("kind"), &["page_mapping", "kind"], issues)?;

    match kind {
        mapper_kinds::PATH => {
            let prefix = optional_string(table.get("prefix"), &["page_mapping", "prefix"], issues)?;
            Some(MapperSpec::Path {
                prefix: prefix.map(str::to_string),
            })
        }
        mapper_kinds::FILE => {
            let path = required_string(table.get("path"), &["page_mapping", "path"], issues)?;
            Some(MapperSpec::File {
                path: PathBuf::from(path),
            })
        }
        mapper_kinds::COMMAND => {
            let program =
                required_string(table.get("program"), &["page_mapping", "program"], issues);
            let args = string_array(table.get("args"), &["page_mapping", "args"], issues);
            Some(MapperSpec::Command {
                program: program?.to_string(),
                args: args?,
            })
        }
        other => {
            issues.push(Issue::new(
                &["page_mapping", "kind"],
                format!(
                    "Invalid enum value. Expected {}, received '{other}'",
                    quoted_choices(&mapper_kinds::ALL)
                ),
            ));
            None
        }
    }
}

fn string_array(value: Option<&Value>, path: &[&str], issues: &mut Vec<Issue>) -> Option<Vec<String>> {
    match value {
        None => Some(Vec::new()),
        Some(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            if strings.is_none() {
                issues.push(Issue::new(path, "Expected array of strings"));
            }
            strings
        }
        Some(_) => {
            issues.push(Issue::new(path, "Expected array of strings"));
            None
        }
    }
}

fn quoted_choices(choices: &[&str]) -> String {
    choices
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}
