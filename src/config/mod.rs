// ABOUTME: Configuration management for skydeck
// Handles backend connection settings, wizard timing and output preferences

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Provisioning wizard behaviour
    #[serde(default)]
    pub wizard: WizardConfig,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the console API, e.g. https://api.example.com/api
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token sent as `Authorization: Token <token>`
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds; there are no retries on top of it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Parse the base URL, requiring an http(s) scheme
    pub fn validated_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("API base URL must use http or https, got '{}'", url.scheme());
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// How long the success state stays visible before the wizard closes (default: 1500ms)
    #[serde(default = "default_success_delay_ms")]
    pub success_delay_ms: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            success_delay_ms: default_success_delay_ms(),
        }
    }
}

impl WizardConfig {
    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Default output format for CLI commands ("text" or "json")
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Ask before deleting a resource
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            confirm_delete: default_true(),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_success_delay_ms() -> u64 {
    1500
}

fn default_output_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from default locations, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        for path in Self::get_config_paths() {
            if path.exists() {
                let file_config = Self::load_from_path(&path)?;
                debug!("Merged config from {}", path.display());
                config.merge(file_config);
            }
        }

        config.apply_env(&load_from_env());
        Ok(config)
    }

    /// Load a single config file without merging
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get configuration file paths, lowest precedence first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/skydeck/config.toml")];

        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".skydeck").join("config.toml"));
        }

        paths
    }

    /// Get user configuration directory
    fn get_user_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".skydeck").join("config"))
    }

    /// Merge a higher-precedence config into this one
    fn merge(&mut self, other: AppConfig) {
        if other.api.base_url != default_base_url() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }
        if other.api.timeout_secs != default_timeout_secs() {
            self.api.timeout_secs = other.api.timeout_secs;
        }

        if other.wizard.success_delay_ms != default_success_delay_ms() {
            self.wizard.success_delay_ms = other.wizard.success_delay_ms;
        }

        if other.ui_preferences.output_format != default_output_format() {
            self.ui_preferences.output_format = other.ui_preferences.output_format;
        }
        if other.ui_preferences.confirm_delete != default_true() {
            self.ui_preferences.confirm_delete = other.ui_preferences.confirm_delete;
        }
    }

    /// Apply `SKYDECK_*` overrides
    fn apply_env(&mut self, env: &HashMap<String, String>) {
        if let Some(url) = env.get("SKYDECK_API_URL") {
            self.api.base_url = url.clone();
        }
        if let Some(token) = env.get("SKYDECK_API_TOKEN") {
            self.api.token = Some(token.clone());
        }
        if let Some(raw) = env.get("SKYDECK_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!("Ignoring non-numeric SKYDECK_TIMEOUT_SECS: {}", raw),
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            wizard: WizardConfig::default(),
            ui_preferences: UiPreferences::default(),
        }
    }
}

/// Load configuration from environment
pub fn load_from_env() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("SKYDECK_"))
        .collect()
}
