// src/core/config_manager.rs
//! Configuration: optional config.yaml section, environment overrides, defaults

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::chat::client::{MAX_TOP_K, MIN_TOP_K};
use crate::chat::context::{ComplexityRule, DEFAULT_COMPLEX_KEYWORDS};
use crate::chat::hr::HR_TOP_K;
use crate::core::service_client::DEFAULT_TIMEOUT_SECS;

pub const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_GRADING_URL: &str = "http://localhost:8001";
pub const DEFAULT_CHAT_URL: &str = "http://localhost:8000";
pub const DEFAULT_DATABASE_PATH: &str = "cvpilot.db";
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub grading_url: String,
    pub chat_url: String,
    /// Job Finder chat backend; the HR chat URL when unset
    pub job_finder_chat_url: Option<String>,
    pub grading_timeout_seconds: u64,
    pub chat_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            grading_url: DEFAULT_GRADING_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            job_finder_chat_url: None,
            grading_timeout_seconds: DEFAULT_TIMEOUT_SECS,
            chat_timeout_seconds: DEFAULT_CHAT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub hr_top_k: u32,
    pub complex_keywords: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            hr_top_k: HR_TOP_K,
            complex_keywords: DEFAULT_COMPLEX_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// One section of config.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub services: ServiceConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<EnvironmentConfig>,
    #[serde(default)]
    production: Option<EnvironmentConfig>,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub services: ServiceConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
}

impl ConfigManager {
    /// Load from ./config.yaml and the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(config_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("CVPILOT_ENV")
            .or_else(|| lookup("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string());
        info!("Loading configuration for environment: {}", environment);

        let base = Self::load_file(config_path, &environment)?;
        let mut config = Self {
            environment,
            services: base.services,
            storage: base.storage,
            chat: base.chat,
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;

        info!(
            "Grading service: {}, chat service: {}, database: {}",
            config.services.grading_url,
            config.services.chat_url,
            config.storage.database_path.display()
        );
        Ok(config)
    }

    fn load_file(config_path: &Path, environment: &str) -> Result<EnvironmentConfig> {
        if !config_path.exists() {
            info!("{} not found, using defaults", config_path.display());
            return Ok(EnvironmentConfig::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("GRADING_API_URL") {
            self.services.grading_url = url;
        }
        if let Some(url) = lookup("CHAT_API_URL") {
            self.services.chat_url = url;
        }
        if let Some(url) = lookup("JOB_FINDER_CHAT_API_URL") {
            self.services.job_finder_chat_url = Some(url);
        }
        if let Some(path) = lookup("CVPILOT_DB_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("CHAT_TIMEOUT_SECS") {
            self.services.chat_timeout_seconds = secs
                .trim()
                .parse()
                .with_context(|| format!("CHAT_TIMEOUT_SECS must be a number of seconds, got {:?}", secs))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&self.chat.hr_top_k) {
            bail!(
                "chat.hr_top_k must be between {} and {}, got {}",
                MIN_TOP_K,
                MAX_TOP_K,
                self.chat.hr_top_k
            );
        }
        Ok(())
    }

    pub fn job_finder_chat_url(&self) -> &str {
        self.services
            .job_finder_chat_url
            .as_deref()
            .unwrap_or(&self.services.chat_url)
    }

    pub fn grading_timeout(&self) -> Duration {
        Duration::from_secs(self.services.grading_timeout_seconds)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.services.chat_timeout_seconds)
    }

    pub fn complexity_rule(&self) -> ComplexityRule {
        ComplexityRule::new(&self.chat.complex_keywords)
    }

    /// Ensure the database directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        if let Some(db_parent) = self.storage.database_path.parent() {
            if !db_parent.as_os_str().is_empty() {
                FsOps::ensure_dir_exists(db_parent)
                    .await
                    .with_context(|| format!("Failed to create {}", db_parent.display()))?;
            }
        }
        Ok(())
    }
}
