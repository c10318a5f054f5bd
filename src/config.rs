// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use tracing::debug;
use url::Url;

// Net config
pub const DEFAULT_ENDPOINT: &str = "http://sjce.ac.in/view-results";
pub const DEFAULT_SUBMIT_ACTION: &str = "Fetch+Result";
pub const DEFAULT_DEADLINE_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("resultfetch/", env!("CARGO_PKG_VERSION"));

// Environment overrides, read by the binary only
pub const ENV_ENDPOINT: &str = "RESULTFETCH_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "RESULTFETCH_TIMEOUT_SECS";

/// Where and how to fetch results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Result endpoint the USN form is posted to.
    pub endpoint: Url,
    /// Value of the form's `Action` field, before form encoding.
    pub submit_action: String,
    /// Per-request transport timeout. `None` keeps the client default.
    pub request_timeout_secs: Option<u64>,
    /// Deadline for the whole validate → fetch → parse → score run.
    pub deadline_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint should parse"),
            submit_action: DEFAULT_SUBMIT_ACTION.to_string(),
            request_timeout_secs: None,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load a YAML file; missing keys fall back to the defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let config: Config =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        debug!(path = %path.display(), endpoint = %config.endpoint, "loaded config file");
        Ok(config)
    }

    /// Apply [`ENV_ENDPOINT`] / [`ENV_TIMEOUT_SECS`] as returned by `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ENDPOINT) {
            self.endpoint =
                Url::parse(raw.trim()).with_context(|| format!("{} is not a URL", ENV_ENDPOINT))?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.deadline_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn with_process_env(self) -> Result<Self> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
