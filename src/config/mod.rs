// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the FRITZ!Box exporter
//!
//! Loads the YAML configuration file and applies environment overrides.

pub mod duration;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};


/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const LISTEN_ADDR: &str = "0.0.0.0:3000";
    pub const BASE_URL: &str = "http://fritz.box";
    pub const DEVICE_MONITORING_INTERVAL: Duration = Duration::from_secs(5 * 60);
    /// The FRITZ!Box reports the last 100 seconds of traffic in 20 buckets of 5 seconds
    pub const NETWORK_MONITORING_INTERVAL: Duration = Duration::from_secs(100);
    pub const CONFIG_FILE_NAME: &str = ".fritz-mon.yml";
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
    pub const BASE_URL: &str = "FRITZBOX_BASE_URL";
    pub const USERNAME: &str = "FRITZBOX_USERNAME";
    pub const PASSWORD: &str = "FRITZBOX_PASSWORD";
}

/// Connection settings for the FRITZ!Box
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FritzBoxConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for FritzBoxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FritzBoxConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for FritzBoxConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address at which `/metrics` is served
    pub listen_addr: String,
    /// How often device metrics are requested from the FRITZ!Box
    #[serde(with = "duration")]
    pub device_monitoring_interval: Duration,
    /// How often network metrics are requested from the FRITZ!Box
    #[serde(with = "duration")]
    pub network_monitoring_interval: Duration,
    pub fritzbox: FritzBoxConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: defaults::LISTEN_ADDR.to_string(),
            device_monitoring_interval: defaults::DEVICE_MONITORING_INTERVAL,
            network_monitoring_interval: defaults::NETWORK_MONITORING_INTERVAL,
            fritzbox: FritzBoxConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    defaults::BASE_URL.to_string()
}

impl Config {
    /// Default location of the configuration file (`$HOME/.fritz-mon.yml`)
    pub fn default_path() -> std::path::PathBuf {
        std::env::var_os("HOME")
            .map(std::path::PathBuf::from)
            .unwrap_or_default()
            .join(defaults::CONFIG_FILE_NAME)
    }

    /// Loads the configuration file, applies environment overrides and validates
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read, `AppError::Config` if it
    /// is not valid YAML and `AppError::InvalidConfig` if validation fails.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading configuration file {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&text)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML document, filling missing keys with defaults
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for malformed YAML or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
            .map_err(|e| AppError::Config(format!("failed to parse config file: {e}")))
    }

    /// Serializes the configuration back to YAML
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("failed to encode config file: {e}")))
    }

    /// Overrides file values with environment variables (and `.env`)
    pub fn apply_env(&mut self) {
        dotenvy::dotenv().ok();
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overrides file values with whatever `lookup` returns for the
    /// `LISTEN_ADDR` and `FRITZBOX_*` keys
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup(env_vars::LISTEN_ADDR) {
            self.listen_addr = addr;
        }
        if let Some(base_url) = lookup(env_vars::BASE_URL) {
            self.fritzbox.base_url = base_url;
        }
        if let Some(username) = lookup(env_vars::USERNAME) {
            self.fritzbox.username = username;
        }
        if let Some(password) = lookup(env_vars::PASSWORD) {
            self.fritzbox.password = password;
        }
    }

    /// Validates the configuration, reporting every problem at once
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidConfig` listing all problems found.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.listen_addr.trim().is_empty() {
            problems.push("missing listen_addr".to_string());
        }
        if self.fritzbox.username.trim().is_empty() {
            problems.push("missing fritzbox.username".to_string());
        }
        if self.fritzbox.password.is_empty() {
            problems.push("missing fritzbox.password".to_string());
        }
        if self.device_monitoring_interval.is_zero() {
            problems.push("device_monitoring_interval cannot be zero".to_string());
        }
        if self.network_monitoring_interval.is_zero() {
            problems.push("network_monitoring_interval cannot be zero".to_string());
        }
        if self.fritzbox.base_url.trim().is_empty() {
            problems.push("FRITZ!Box base URL cannot be empty".to_string());
        } else if let Err(e) = url::Url::parse(&self.fritzbox.base_url) {
            problems.push(format!(
                "invalid FRITZ!Box base URL '{}': {e}",
                self.fritzbox.base_url
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidConfig(problems))
        }
    }
}
