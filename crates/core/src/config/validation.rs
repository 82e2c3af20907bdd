//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound for a single grouped write.
const MAX_BATCH_SIZE: usize = 10_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

/// Whether `name` is a bare SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Table names are interpolated into SQL, so nothing else is accepted.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `table` is not a plain SQL identifier
    /// - `prefix` does not start and end with `/`
    /// - `bind_addr` is not a socket address
    /// - `batch_size` is 0, exceeds 10000, or is not a multiple of 5
    /// - `seed_count` is not a multiple of 5
    /// - `progress_every` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_table_name(&self.table) {
            return Err(ConfigError::Invalid {
                field: "table".into(),
                reason: "must match [A-Za-z_][A-Za-z0-9_]*".into(),
            });
        }

        if !self.prefix.starts_with('/') || !self.prefix.ends_with('/') {
            return Err(ConfigError::Invalid { field: "prefix".into(), reason: "must start and end with '/'".into() });
        }

        if let Err(e) = self.bind_addr.parse::<SocketAddr>() {
            return Err(ConfigError::Invalid { field: "bind_addr".into(), reason: e.to_string() });
        }

        if self.batch_size == 0 {
            return Err(ConfigError::Invalid { field: "batch_size".into(), reason: "must be greater than 0".into() });
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Invalid {
                field: "batch_size".into(),
                reason: format!("must not exceed {MAX_BATCH_SIZE}"),
            });
        }
        if self.batch_size % 5 != 0 {
            return Err(ConfigError::Invalid { field: "batch_size".into(), reason: "must be a multiple of 5".into() });
        }

        if self.seed_count % 5 != 0 {
            return Err(ConfigError::Invalid { field: "seed_count".into(), reason: "must be a multiple of 5".into() });
        }

        if self.progress_every == 0 {
            return Err(ConfigError::Invalid {
                field: "progress_every".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.seed_count % self.batch_size as u64 != 0 {
            tracing::warn!(
                seed_count = self.seed_count,
                batch_size = self.batch_size,
                "seed_count is not a multiple of batch_size; the last batch will be short"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_table_name() {
        assert!(is_valid_table_name("urls"));
        assert!(is_valid_table_name("_urls_2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2urls"));
        assert!(!is_valid_table_name("url-safety"));
        assert!(!is_valid_table_name("urls; DROP TABLE x"));

        let config = AppConfig { table: "url-safety".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "table"));
    }

    #[test]
    fn test_validate_prefix() {
        let config = AppConfig { prefix: "/urlinfo/1".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "prefix"));
    }

    #[test]
    fn test_validate_bind_addr() {
        let config = AppConfig { bind_addr: "localhost".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "bind_addr"));
    }

    #[test]
    fn test_validate_batch_size_zero() {
        let config = AppConfig { batch_size: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "batch_size"));
    }

    #[test]
    fn test_validate_batch_size_exceeds_limit() {
        let config = AppConfig { batch_size: 10_005, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "batch_size"));
    }

    #[test]
    fn test_validate_batch_size_not_multiple_of_five() {
        let config = AppConfig { batch_size: 52, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "batch_size"));
    }

    #[test]
    fn test_validate_seed_count_not_multiple_of_five() {
        let config = AppConfig { seed_count: 101, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "seed_count"));
    }

    #[test]
    fn test_validate_progress_every_zero() {
        let config = AppConfig { progress_every: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "progress_every"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { batch_size: 5, seed_count: 0, progress_every: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config = AppConfig { batch_size: 10_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
