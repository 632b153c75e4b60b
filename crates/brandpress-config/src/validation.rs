// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges before anything is
//! built from them.

use crate::{BrandpressConfig, ConfigError, ConfigResult};
use brandpress_codec::MAX_COMPRESSION_LEVEL;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Compression level within 0-9
/// - Non zero nesting depth
/// - Known log level
/// - Non empty blob directory
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &BrandpressConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_codec(config, &mut errors);
    validate_logging(config, &mut errors);
    validate_storage(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_codec(config: &BrandpressConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.codec.compression_level > MAX_COMPRESSION_LEVEL {
        errors.push(ConfigValidationError::InvalidValue {
            field: "codec.compression_level".to_string(),
            reason: format!(
                "{} is above the maximum of {}",
                config.codec.compression_level, MAX_COMPRESSION_LEVEL
            ),
        });
    }
    if config.codec.max_depth == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "codec.max_depth".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
}

fn validate_logging(config: &BrandpressConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
}

fn validate_storage(config: &BrandpressConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.storage.blob_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "storage.blob_dir".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BrandpressConfig::default()).is_ok());
    }

    #[test]
    fn test_all_problems_reported() {
        let mut config = BrandpressConfig::default();
        config.codec.compression_level = 10;
        config.codec.max_depth = 0;
        config.logging.level = "loud".to_string();
        config.storage.blob_dir = Default::default();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(message)) => {
                assert!(message.contains("codec.compression_level"));
                assert!(message.contains("codec.max_depth"));
                assert!(message.contains("logging.level"));
                assert!(message.contains("storage.blob_dir"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = BrandpressConfig::default();
        config.logging.level = "WARN".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
