//! Configuration file parser for ~/.config/tuber/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields`
//! off), though we log a warning when the file contains potential typos.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds the maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// No API credential in the environment or the config file.
    #[error("No API key configured. Set TUBER_API_KEY or add api_key to config.toml.")]
    MissingApiKey,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified;
/// missing keys fall back to `Default::default()`.
///
/// A custom Debug impl masks `api_key` to keep the credential out of logs,
/// error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video platform API key (alternative to the TUBER_API_KEY env var).
    /// The env var takes precedence over the config file.
    pub api_key: Option<String>,

    /// Region code for the popular chart (ISO 3166-1 alpha-2).
    pub region: String,

    /// Theme variant name ("dark" or "light"). Overridden by the persisted
    /// dark-mode preference once one exists.
    pub theme: String,

    /// Number of videos requested per feed fetch.
    pub feed_page_size: u32,

    /// Number of comments requested per video.
    pub comment_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            region: "US".to_string(),
            theme: "dark".to_string(),
            feed_page_size: 50,
            comment_page_size: 20,
        }
    }
}

/// Mask the API key in Debug output to prevent credential leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("theme", &self.theme)
            .field("feed_page_size", &self.feed_page_size)
            .field("comment_page_size", &self.comment_page_size)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to prevent memory exhaustion from a
        // corrupted or maliciously large config file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to flag unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "api_key",
                "region",
                "theme",
                "feed_page_size",
                "comment_page_size",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), region = %config.region, "Loaded configuration");
        Ok(config)
    }

    /// Resolve the API credential: the TUBER_API_KEY environment variable
    /// wins over the config file. The key never leaves `SecretString` after
    /// this point.
    pub fn resolve_api_key(&self) -> Result<SecretString, ConfigError> {
        if let Ok(key) = std::env::var("TUBER_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(SecretString::from(key));
            }
        }
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from)
            .ok_or(ConfigError::MissingApiKey)
    }
}

// ============================================================================
// Tests
// ============================================================================
