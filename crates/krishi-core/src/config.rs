use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::conversation::DEFAULT_REPLY_DELAY;
use crate::language::Language;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub language: Option<String>,
    pub reply_delay_ms: Option<u64>,
    pub corpus_path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            language: Some(Language::default().as_str().to_string()),
            reply_delay_ms: None,
            corpus_path: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Like `load`, but a missing directory or a broken file falls back to defaults
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read config, using defaults");
            Self::new()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Rewrite only the language of the file at `config_path`, keeping other settings
    pub fn save_language_to(config_path: &Path, language: Language) -> Result<()> {
        let mut config = Self::load_from(config_path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read config, using defaults");
            Self::new()
        });
        config.language = Some(language.as_str().to_string());
        config.save_to(config_path)
    }

    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .and_then(Language::from_str)
            .unwrap_or_default()
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REPLY_DELAY)
    }

    /// Directory holding the config file and the log
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("krishi-sahyog"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
