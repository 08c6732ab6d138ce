//! Configuration loading and config file resolution
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `EMP_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/emp/config.toml` on Linux)
//! 4. Compiled defaults (no file)
//!
//! A missing or unreadable file never aborts startup: a warning is logged and
//! compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "EMP_CONFIG";

/// Upper bound on catalog page sizes
pub const MAX_PAGE_SIZE: u32 = 10;

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
    pub inference: InferenceConfig,
    pub text_emotion: TextEmotionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Music catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Optional ISO 3166-1 market code passed to search
    pub market: Option<String>,
    pub search_limit: u32,
    pub item_limit: u32,
    /// Minimum spacing between catalog requests
    pub requests_per_second: u32,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            market: None,
            search_limit: MAX_PAGE_SIZE,
            item_limit: MAX_PAGE_SIZE,
            requests_per_second: 5,
            timeout_seconds: 30,
        }
    }
}

impl CatalogConfig {
    /// Search page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn effective_search_limit(&self) -> u32 {
        self.search_limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Track page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn effective_item_limit(&self) -> u32 {
        self.item_limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Hosted model inference configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub asr_model: String,
    pub tone_model: String,
    pub translation_model: String,
    pub sentiment_model: String,
    /// Language the listener speaks
    pub source_language: String,
    /// Language the sentiment model was trained on
    pub target_language: String,
    pub timeout_seconds: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            api_token: None,
            asr_model: "openai/whisper-small".to_string(),
            tone_model: "superb/hubert-base-superb-er".to_string(),
            translation_model: "Helsinki-NLP/opus-mt-ja-en".to_string(),
            sentiment_model: "cardiffnlp/twitter-roberta-base-emotion".to_string(),
            source_language: "ja".to_string(),
            target_language: "en".to_string(),
            timeout_seconds: 60,
        }
    }
}

/// Text emotion policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEmotionConfig {
    /// Predictions scoring below this fall back to neutral.
    /// `None` keeps every prediction regardless of confidence.
    pub min_confidence: Option<f64>,
}

/// Resolves which config file to read
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Locate the config file, if any tier names one
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|p| p.exists())
    }

    /// Load configuration, falling back to compiled defaults
    pub fn load(&self) -> TomlConfig {
        let Some(path) = self.resolve_path() else {
            info!("No config file found, using compiled defaults");
            return TomlConfig::default();
        };

        match load_toml_config(&path) {
            Ok(config) => {
                info!("Loaded config: {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} - using compiled defaults", e);
                TomlConfig::default()
            }
        }
    }
}

/// Platform config file location (`<config dir>/emp/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("emp").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Validate a secret value (non-empty, non-whitespace)
pub fn is_valid_secret(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve a secret from environment variable, then TOML value
///
/// **Priority:** ENV → TOML. Blank values count as absent.
pub fn resolve_secret(env_var: &str, toml_value: Option<&str>, label: &str) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_secret(v));
    let toml_value = toml_value.filter(|v| is_valid_secret(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment ({}) and TOML. Using environment.",
            label, env_var
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable", label);
        return Some(value);
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Some(value.to_string());
    }

    None
}
