mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::HeraldError;
use defaults::*;

/// Top-level Herald configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub herald: HeraldConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeraldConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Phrase engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Directory holding `_langs_list.json` and the per-language sources.
    #[serde(default = "default_locale_dir")]
    pub directory: String,
    /// Language used for users that have not picked one yet.
    #[serde(default = "default_language")]
    pub default: String,
    /// HTML-escape substitution values before formatting.
    #[serde(default)]
    pub escape_html: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            directory: default_locale_dir(),
            default: default_language(),
            escape_html: false,
        }
    }
}

/// Log output settings. Console logging is always on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory for the log file. Unset = console only.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file: default_log_file(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, HeraldError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| HeraldError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| HeraldError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
