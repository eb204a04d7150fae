//! Configuration file parsing for the Server.
//!
//! Loads settings from a TOML file, then lets environment variables
//! override the deployment-specific keys (port, database, origins, API key).

use branchcast_domain::branch::DEFAULT_BRANCHES;
use branchcast_domain::BranchRegistry;
use branchcast_fetcher::FetcherConfig;
use branchcast_generator::GeneratorConfig;
use branchcast_llm::gemini::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use branchcast_llm::SafetySetting;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    pub bind_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,

    /// Branch names, in generation order
    pub branches: Vec<String>,

    /// Gemini provider settings
    pub gemini: GeminiSettings,

    /// Article fetcher settings
    pub fetcher: FetcherConfig,

    /// Variant generator settings
    pub generator: GeneratorConfig,
}

/// `[gemini]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key (required, usually from `GOOGLE_AI_API_KEY`)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Alternative API base URL
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature; the model's own default when unset
    pub temperature: Option<f32>,

    /// Moderation rules; hate speech and dangerous content at medium when unset
    pub safety_settings: Option<Vec<SafetySetting>>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
            safety_settings: None,
        }
    }
}

impl GeminiSettings {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 5000,
            database_path: "branchcast.db".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            branches: DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
            gemini: GeminiSettings::default(),
            fetcher: FetcherConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.bind_port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a port number: {}", port)))?;
        }
        if let Some(path) = lookup("BRANCHCAST_DB") {
            self.database_path = path;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(key) = lookup("GOOGLE_AI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        Ok(())
    }

    /// Check everything needed to start serving
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("gemini.api_key".to_string()));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::MissingField("gemini.model".to_string()));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "gemini.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if let Some(t) = self.gemini.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid(format!(
                    "gemini.temperature must be between 0 and 2, got {}",
                    t
                )));
            }
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }
        self.fetcher.validate().map_err(ConfigError::Invalid)?;
        self.generator.validate().map_err(ConfigError::Invalid)?;
        self.registry()?;
        Ok(())
    }

    /// Build the branch registry from the configured names
    pub fn registry(&self) -> Result<BranchRegistry, ConfigError> {
        BranchRegistry::new(self.branches.iter()).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
