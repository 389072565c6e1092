use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::ConfigError;

/// Environment variable holding the OpenWeather credential.
pub const API_KEY_ENV: &str = "API_KEY";
/// Environment variable holding the geocoding client identifier.
pub const USER_AGENT_ENV: &str = "USER_AGENT";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const CONFIGURE_HINT: &str =
    "run `weather configure` or set the API_KEY and USER_AGENT environment variables.";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// user_agent = "my-weather-widget"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OpenWeather API credential.
    pub api_key: Option<String>,

    /// Identifier sent to the geocoding service.
    pub user_agent: Option<String>,

    /// Override for the weather service base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_url: Option<String>,

    /// Override for the geocoding service base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk and overlay the environment.
    pub fn resolve() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Environment values take precedence over the file.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(agent) = lookup(USER_AGENT_ENV).filter(|v| !v.trim().is_empty()) {
            self.user_agent = Some(agent);
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        non_blank(self.api_key.as_deref()).ok_or(ConfigError::Missing {
            key: API_KEY_ENV,
            hint: CONFIGURE_HINT,
        })
    }

    pub fn require_user_agent(&self) -> Result<&str, ConfigError> {
        non_blank(self.user_agent.as_deref()).ok_or(ConfigError::Missing {
            key: USER_AGENT_ENV,
            hint: CONFIGURE_HINT,
        })
    }

    /// Bounded wait applied to every network call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn is_complete(&self) -> bool {
        self.require_api_key().is_ok() && self.require_user_agent().is_ok()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
