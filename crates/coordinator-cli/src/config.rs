//! Runtime settings and credential loading.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::abstract_api::{RetryPolicy, DEFAULT_ENDPOINT};
use crate::Cli;

/// Everything the binary needs after argument parsing.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: Backend,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub enum Backend {
    /// Locations are IANA zone names resolved locally.
    Offline,
    /// Locations are free text resolved by the remote conversion service.
    Remote {
        api_key: String,
        endpoint: String,
        timeout: Duration,
        retry: RetryPolicy,
    },
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let reference_date = cli.date.unwrap_or_else(|| Local::now().date_naive());

        let backend = if cli.offline {
            Backend::Offline
        } else {
            Backend::Remote {
                api_key: load_api_key(&cli.api_key_file)?,
                endpoint: cli
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                timeout: Duration::from_secs(cli.timeout_secs),
                retry: RetryPolicy {
                    max_attempts: cli.retries.max(1),
                    ..RetryPolicy::default()
                },
            }
        };

        Ok(Self {
            backend,
            reference_date,
        })
    }
}

/// Default location of the credential file, relative to the working directory.
pub fn default_api_key_file() -> PathBuf {
    PathBuf::from("API_KEY.txt")
}

/// Read the API key from the first line of `path`.
///
/// A missing or unreadable file, an empty first line, or a key containing
/// whitespace is an error.
pub fn load_api_key(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read API key file: {}", path.display()))?;
    parse_api_key(&contents)
        .with_context(|| format!("Malformed API key file: {}", path.display()))
}

fn parse_api_key(contents: &str) -> Result<String> {
    let key = contents.lines().next().unwrap_or_default().trim();
    if key.is_empty() {
        bail!("first line is empty");
    }
    if key.chars().any(char::is_whitespace) {
        bail!("API key must not contain whitespace");
    }
    Ok(key.to_string())
}
