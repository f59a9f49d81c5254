use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bots::{self, Bot, default_bots};
use crate::error::{Error, Result};
use crate::html::Theme;

pub const WEBHOOK_URL_ENV: &str = "COCKPIT_WEBHOOK_URL";
pub const API_KEY_ENV: &str = "COCKPIT_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default = "default_bots")]
    pub bots: Vec<Bot>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook: WebhookConfig::default(),
            display: DisplayConfig::default(),
            history: HistoryConfig::default(),
            bots: default_bots(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: 180,
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: Theme,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cockpit-history.json"),
        }
    }
}

impl Config {
    /// Load config from a TOML file, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `COCKPIT_WEBHOOK_URL` and `COCKPIT_API_KEY` on top of the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(WEBHOOK_URL_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    fn with_overrides(mut self, url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.webhook.url = Some(url);
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.webhook.api_key = Some(key);
        }
        self
    }

    pub fn bot(&self, id: &str) -> Result<&Bot> {
        bots::find(&self.bots, id)
    }
}
