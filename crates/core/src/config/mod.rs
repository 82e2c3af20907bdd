//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (URLINFO_*)
//! 2. TOML config file (if URLINFO_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::loader::LoadPlan;

mod validation;

pub use validation::{ConfigError, is_valid_table_name};

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (URLINFO_*)
/// 2. TOML config file (if URLINFO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite verdict database.
    ///
    /// Set via URLINFO_DB_PATH environment variable.
    /// Required by both the server and the seeder.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Verdict table name.
    ///
    /// Set via URLINFO_TABLE environment variable.
    #[serde(default = "default_table")]
    pub table: String,

    /// Socket address the HTTP server listens on.
    ///
    /// Set via URLINFO_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Route prefix the lookup endpoint is mounted under.
    ///
    /// Set via URLINFO_PREFIX environment variable.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Number of records the seeder generates.
    ///
    /// Set via URLINFO_SEED_COUNT environment variable.
    #[serde(default = "default_seed_count")]
    pub seed_count: u64,

    /// Records per grouped write during seeding.
    ///
    /// Set via URLINFO_BATCH_SIZE environment variable.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seeder progress log interval, in records.
    ///
    /// Set via URLINFO_PROGRESS_EVERY environment variable.
    #[serde(default = "default_progress_every")]
    pub progress_every: u64,
}

fn default_table() -> String {
    "urls".into()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".into()
}

fn default_prefix() -> String {
    "/urlinfo/1/".into()
}

fn default_seed_count() -> u64 {
    4_000_000
}

fn default_batch_size() -> usize {
    100
}

fn default_progress_every() -> u64 {
    100_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            table: default_table(),
            bind_addr: default_bind_addr(),
            prefix: default_prefix(),
            seed_count: default_seed_count(),
            batch_size: default_batch_size(),
            progress_every: default_progress_every(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `URLINFO_`
    /// 2. TOML file from `URLINFO_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::extract()?;

        config.validate()?;

        Ok(config)
    }

    /// Merge all sources like [`AppConfig::load`] without validating.
    ///
    /// For callers that layer further overrides (e.g. command-line flags)
    /// and then call [`AppConfig::validate`] once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if a source cannot be read or parsed.
    pub fn extract() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("URLINFO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("URLINFO_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))
    }

    /// Store address, required before any store access.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the database path is not set.
    pub fn require_db_path(&self) -> Result<&PathBuf, ConfigError> {
        self.db_path.as_ref().ok_or_else(|| ConfigError::Missing {
            field: "db_path".into(),
            hint: "Set URLINFO_DB_PATH environment variable".into(),
        })
    }

    /// Seeding parameters for the bulk loader.
    pub fn load_plan(&self) -> LoadPlan {
        LoadPlan { count: self.seed_count, batch_size: self.batch_size, progress_every: self.progress_every }
    }
}
