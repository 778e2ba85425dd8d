//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PANTRY_DATABASE_PATH, PANTRY_PORT, GEMINI_API_KEY, ...             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path> or PANTRY_CONFIG                                   │
//! │     ~/.config/pantry/pantry.toml (Linux)                               │
//! │     ~/Library/Application Support/com.pantry.pantry/pantry.toml        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:8000, ./pantry.db, no external services                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8000
//! static_dir = "./static"
//!
//! [database]
//! path = "./pantry.db"
//! max_connections = 5
//!
//! [gemini]
//! api_key = "..."
//! model = "gemini-2.5-flash-lite"
//!
//! [spoonacular]
//! api_key = "..."
//! timeout_secs = 10
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use pantry_assist::{gemini, spoonacular};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served as the fallback route (the web UI).
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./pantry.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_gemini_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

impl Default for GeminiSettings {
    fn default() -> Self {
        GeminiSettings {
            api_key: None,
            model: default_gemini_model(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoonacularSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_spoonacular_timeout")]
    pub timeout_secs: u64,
}

fn default_spoonacular_timeout() -> u64 {
    spoonacular::DEFAULT_TIMEOUT_SECS
}

impl Default for SpoonacularSettings {
    fn default() -> Self {
        SpoonacularSettings {
            api_key: None,
            base_url: None,
            timeout_secs: default_spoonacular_timeout(),
        }
    }
}

/// Trims a key and treats blank as absent.
fn configured_key(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

impl GeminiSettings {
    pub fn key(&self) -> Option<&str> {
        configured_key(&self.api_key)
    }
}

impl SpoonacularSettings {
    pub fn key(&self) -> Option<&str> {
        configured_key(&self.api_key)
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PantryConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub spoonacular: SpoonacularSettings,
}

impl PantryConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pantry.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let explicit = config_path.or_else(|| std::env::var("PANTRY_CONFIG").ok().map(PathBuf::from));
        if let Some(path) = explicit.clone().or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else if explicit.is_some() {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be greater than 0".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.spoonacular.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "spoonacular.timeout_secs must be greater than 0".into(),
            ));
        }

        for (name, url) in [
            ("gemini.base_url", &self.gemini.base_url),
            ("spoonacular.base_url", &self.spoonacular.base_url),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Invalid(format!(
                        "{} must start with http:// or https://, got: {}",
                        name, url
                    )));
                }
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production, a map in tests).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("PANTRY_DATABASE_PATH").or_else(|| var("DATABASE_PATH")) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(addr) = var("PANTRY_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = var("PANTRY_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding port from environment");
                self.server.port = p;
            }
        }

        if let Some(dir) = var("PANTRY_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }

        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini.model = model;
        }

        if let Some(key) = var("SPOONACULAR_API_KEY") {
            self.spoonacular.api_key = Some(key);
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pantry", "pantry")
            .map(|dirs| dirs.config_dir().join("pantry.toml"))
    }
}
