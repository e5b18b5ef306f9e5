//! Configuration: completion endpoint and query settings, loaded from a TOML
//! file in the user config directory with full defaults.

use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

/// Manages config directory and config file paths.
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to a file within the config directory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Name of the environment variable holding the bearer credential.
    pub api_key_env: String,
    /// Per-request timeout in seconds (enforced by the transport).
    pub timeout_seconds: u64,
    /// Pause between rate-limited attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "meta-llama/llama-3.3-70b-instruct:free".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_seconds: 30,
            retry_delay_ms: 2_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Upper bound on preview rows included in an augmented prompt.
    pub preview_rows: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { preview_rows: 20 }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub query: QueryConfig,
}

impl AppConfig {
    /// Load configuration: defaults, overridden by the user config file when
    /// one exists at `<config dir>/<app_name>/config.toml`.
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        let config_path = manager.config_path("config.toml");
        let config = Self::load_from_file(&config_path)?;
        config.validate().map_err(|e| {
            eyre!("Invalid configuration in {}: {}", config_path.display(), e)
        })?;
        Ok(config)
    }

    /// Load from a specific file; a missing file means default config.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read config file at {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file at {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.completion.endpoint.is_empty() {
            return Err(eyre!("completion.endpoint must not be empty"));
        }
        if self.completion.model.is_empty() {
            return Err(eyre!("completion.model must not be empty"));
        }
        if self.completion.timeout_seconds == 0 {
            return Err(eyre!("completion.timeout_seconds must be greater than 0"));
        }
        if self.query.preview_rows == 0 {
            return Err(eyre!("query.preview_rows must be greater than 0"));
        }
        Ok(())
    }
}
