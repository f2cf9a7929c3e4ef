use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "contractdraft.toml";

/// Configuration loaded from contractdraft.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API
    #[serde(default = "default_gemini_url")]
    pub url: String,
    /// Model name to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Timeout in seconds for API requests
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            url: default_gemini_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

/// Generation retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

/// Behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Echo generated text to the terminal as it streams in
    #[serde(default)]
    pub stream_output: bool,
    /// Folder holding user-defined contract types, relative to the project root
    #[serde(default = "default_contracts_dir")]
    pub contracts_dir: PathBuf,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            stream_output: false,
            contracts_dir: default_contracts_dir(),
        }
    }
}

fn default_contracts_dir() -> PathBuf {
    PathBuf::from("contracts")
}

/// Command-line overrides applied on top of the file configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub url: Option<String>,
    pub timeout: Option<u64>,
    pub max_attempts: Option<u32>,
    pub stream: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from contractdraft.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(m) = overrides.model {
            self.gemini.model = m;
        }
        if let Some(u) = overrides.url {
            self.gemini.url = u;
        }
        if let Some(t) = overrides.timeout {
            self.gemini.timeout_seconds = t;
        }
        if let Some(n) = overrides.max_attempts {
            self.generation.max_attempts = n;
        }
        if overrides.stream {
            self.behavior.stream_output = true;
        }
        self
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "generation.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "gemini.model must not be empty".to_string(),
            ));
        }
        if self.gemini.api_key_env.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "gemini.api_key_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}
