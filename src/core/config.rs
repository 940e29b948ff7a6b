use crate::core::amount::parse_amount;
use crate::core::currency::Currency;
use crate::core::poller::DEFAULT_POLL_INTERVAL;
use crate::providers::rates_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

/// Converts a poll interval in milliseconds. Zero is rejected.
pub fn poll_interval_from_millis(millis: u64) -> Result<Duration> {
    if millis == 0 {
        bail!("Poll interval must be greater than zero");
    }
    Ok(Duration::from_millis(millis))
}

fn default_amount() -> String {
    "1".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub base: Currency,
    #[serde(default = "default_amount")]
    pub amount: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
            base: Currency::default(),
            amount: default_amount(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults
    /// when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "ratewatch", "ratewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn poll_interval(&self) -> Result<Duration> {
        poll_interval_from_millis(self.poll_interval_ms)
            .context("Invalid poll_interval_ms in config")
    }

    pub fn multiplier(&self) -> Result<Option<Decimal>> {
        parse_amount(&self.amount).context("Invalid amount in config")
    }
}
