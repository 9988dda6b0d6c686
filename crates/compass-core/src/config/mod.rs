//! Configuration management for Career Compass.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `compass.toml` file
//! 3. User config `~/.config/career-compass/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = "compass.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Web search configuration.
    pub search: SearchConfig,

    /// Job page scraping configuration.
    pub scraper: ScraperConfig,

    /// Package index configuration for manifest checks.
    pub registry: RegistryConfig,

    /// Storage configuration.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./compass.toml` (project local)
    /// 2. `~/.config/career-compass/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::locate() {
            Some(path) => Self::read_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path.as_ref())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Returns the config file `load` would read, if any.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join(DEFAULT_APP_NAME).join("config.toml"))
            .filter(|path| path.exists())
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(provider) = std::env::var("COMPASS_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("COMPASS_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("COMPASS_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("COMPASS_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(tokens) = std::env::var("COMPASS_LLM_MAX_TOKENS") {
            if let Ok(n) = tokens.parse() {
                self.llm.max_tokens = n;
            }
        }
        if let Ok(temperature) = std::env::var("COMPASS_LLM_TEMPERATURE") {
            if let Ok(t) = temperature.parse() {
                self.llm.temperature = t;
            }
        }

        // Registry overrides
        if let Ok(url) = std::env::var("COMPASS_INDEX_URL") {
            self.registry.index_url = url;
        }

        // Storage overrides
        if let Ok(dir) = std::env::var("COMPASS_DATA_DIR") {
            self.storage.data_dir = dir;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("COMPASS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("COMPASS_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(dir) = std::env::var("COMPASS_LOG_DIR") {
            self.logging.dir = Some(dir);
        }
    }

    /// Rejects values that would make later operations fail obscurely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }
        if self.registry.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "registry.concurrency must be at least 1".to_string(),
            ));
        }
        if self.scraper.user_agents.is_empty() {
            return Err(ConfigError::Invalid(
                "scraper.user_agents must not be empty".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "groq", "openai", "ollama", or "openai-compatible".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for API (for openai-compatible providers).
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            match self.provider.to_ascii_lowercase().as_str() {
                "openai" => DEFAULT_OPENAI_MODEL.to_string(),
                "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
                _ => DEFAULT_GROQ_MODEL.to_string(),
            }
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            match self.provider.to_ascii_lowercase().as_str() {
                "openai" | "openai-compatible" => DEFAULT_OPENAI_URL.to_string(),
                "ollama" => DEFAULT_OLLAMA_URL.to_string(),
                _ => DEFAULT_GROQ_URL.to_string(),
            }
        })
    }
}

/// Web search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint (DuckDuckGo HTML interface).
    pub base_url: String,

    /// Job listings returned per search.
    pub max_results: usize,

    /// Results consulted when looking for alternate job sources.
    pub alternate_results: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            alternate_results: DEFAULT_ALTERNATE_RESULTS,
            timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Job page scraping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Page fetch timeout in seconds.
    pub timeout_secs: u64,

    /// Alternate source fetch timeout in seconds.
    pub alternate_timeout_secs: u64,

    /// Maximum characters of page text kept.
    pub full_text_limit: usize,

    /// Characters used for the description when no section is found.
    pub description_preview: usize,

    /// User agents, tried in order.
    pub user_agents: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            alternate_timeout_secs: DEFAULT_ALTERNATE_TIMEOUT_SECS,
            full_text_limit: DEFAULT_FULL_TEXT_LIMIT,
            description_preview: DEFAULT_DESCRIPTION_PREVIEW,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn alternate_timeout(&self) -> Duration {
        Duration::from_secs(self.alternate_timeout_secs)
    }
}

/// Package index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the JSON API (`<index_url>/<name>/json`).
    pub index_url: String,

    /// Concurrent lookups.
    pub concurrency: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            concurrency: DEFAULT_REGISTRY_CONCURRENCY,
            timeout_secs: DEFAULT_REGISTRY_TIMEOUT_SECS,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for compass data (default: ".compass").
    pub data_dir: String,

    /// Applications subdirectory name.
    pub applications_dir: String,

    /// Reports subdirectory name.
    pub reports_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            applications_dir: DEFAULT_APPLICATIONS_DIR.to_string(),
            reports_dir: DEFAULT_REPORTS_DIR.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the applications directory.
    pub fn applications_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.applications_dir)
    }

    /// Get the full path to the reports directory.
    pub fn reports_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.reports_dir)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,

    /// "text" or "json".
    pub format: String,

    /// Log directory. Defaults to the platform data dir (`~/.local/share/career-compass` on Linux).
    pub dir: Option<String>,

    /// Also write events to stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: DEFAULT_LOG_FORMAT.to_string(),
            dir: None,
            stderr: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.storage.data_dir, DEFAULT_DATA_DIR);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("[logging]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_model_or_default() {
        let mut config = LLMConfig::default();
        assert_eq!(config.model_or_default(), DEFAULT_GROQ_MODEL);

        config.provider = "ollama".to_string();
        assert_eq!(config.model_or_default(), DEFAULT_OLLAMA_MODEL);

        config.provider = "openai".to_string();
        assert_eq!(config.model_or_default(), DEFAULT_OPENAI_MODEL);

        config.model = Some("custom-model".to_string());
        assert_eq!(config.model_or_default(), "custom-model");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.logging.format = "yaml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scraper.user_agents.clear();
        assert!(config.validate().is_err());
    }
}
