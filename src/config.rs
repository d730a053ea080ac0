// Fri Oct 16 2026 - Alex

use crate::catalog::ForeignAbi;
use crate::emit::{EmitOptions, TargetLanguage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub abi: ForeignAbi,
    pub language: TargetLanguage,
    /// Unset means whatever the language usually does.
    pub explicit_padding: Option<bool>,
    pub strip_common_prefix: Option<bool>,
    pub log_level: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abi: ForeignAbi::SolarisAmd64,
            language: TargetLanguage::Rust,
            explicit_padding: None,
            strip_common_prefix: None,
            log_level: "warn".to_string(),
            color: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(ConfigError::Invalid)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_abi(mut self, abi: ForeignAbi) -> Self {
        self.abi = abi;
        self
    }

    pub fn with_language(mut self, language: TargetLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_explicit_padding(mut self, explicit_padding: bool) -> Self {
        self.explicit_padding = Some(explicit_padding);
        self
    }

    pub fn with_strip_common_prefix(mut self, strip: bool) -> Self {
        self.strip_common_prefix = Some(strip);
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Language defaults with any explicit overrides applied.
    pub fn emit_options(&self) -> EmitOptions {
        let defaults = EmitOptions::for_language(self.language);
        EmitOptions {
            explicit_padding: self.explicit_padding.unwrap_or(defaults.explicit_padding),
            strip_common_prefix: self.strip_common_prefix.unwrap_or(defaults.strip_common_prefix),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        const LEVELS: &[&str] = &["off", "error", "warn", "warning", "info", "debug", "trace"];
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!("log_level must be one of {}", LEVELS.join(", ")));
        }
        if self.language == TargetLanguage::Go && self.explicit_padding == Some(false) {
            return Err("Go mirrors need explicit padding to match cgo output".to_string());
        }
        Ok(())
    }
}
