//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `promzy.toml` config file
//! 3. Default values
//!
//! `${VAR_NAME}` inside the config file is expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "promzy.toml";

/// Chat bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name used in the menu and alive replies
    #[serde(default = "default_bot_name")]
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
        }
    }
}

/// Pair-code bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    /// Number of characters in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Hours until an issued code expires
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

/// Main configuration for promzy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub pair: PairConfig,
}

fn default_bot_name() -> String {
    "Promzy v1".to_string()
}

fn default_code_length() -> usize {
    8
}

fn default_ttl_hours() -> i64 {
    24
}

impl Config {
    /// Expand `${VAR_NAME}` references from the environment.
    ///
    /// Unknown variables expand to an empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse configuration from TOML text (after env expansion)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);
        let mut config: Config = toml::from_str(&expanded)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from `./promzy.toml` when present, otherwise from the environment
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_PATH);
        }

        Self::from_env()
    }

    fn validate(&self) -> Result<()> {
        if self.bot.name.trim().is_empty() {
            return Err(Error::Config("bot.name must not be empty".to_string()));
        }
        if self.pair.code_length == 0 {
            return Err(Error::Config("pair.code_length must be positive".to_string()));
        }
        if self.pair.ttl_hours <= 0 {
            return Err(Error::Config("pair.ttl_hours must be positive".to_string()));
        }
        Ok(())
    }

    /// Environment variables take precedence over the file
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("PROMZY_BOT_NAME") {
            if !name.trim().is_empty() {
                self.bot.name = name;
            }
        }

        if let Ok(length) = std::env::var("PAIR_CODE_LENGTH") {
            match length.parse::<usize>() {
                Ok(n) if n > 0 => self.pair.code_length = n,
                _ => tracing::warn!("Ignoring invalid PAIR_CODE_LENGTH: {}", length),
            }
        }

        if let Ok(hours) = std::env::var("PAIR_CODE_TTL_HOURS") {
            match hours.parse::<i64>() {
                Ok(h) if h > 0 => self.pair.ttl_hours = h,
                _ => tracing::warn!("Ignoring invalid PAIR_CODE_TTL_HOURS: {}", hours),
            }
        }
    }
}
