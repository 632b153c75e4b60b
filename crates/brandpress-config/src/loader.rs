// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones win:
//! 1. TOML file (base values, defaults for anything missing)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, BrandpressConfig, ConfigError, ConfigResult};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "brandpress.toml";

pub const CONFIG_PATH_ENV: &str = "BRANDPRESS_CONFIG_PATH";

/// Find the brandpress configuration file
///
/// Search order:
/// 1. `BRANDPRESS_CONFIG_PATH` environment variable
/// 2. Current working directory: `./brandpress.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|path| path.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrandpressConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let config: BrandpressConfig = toml::from_str(&content)?;
    finish(config, cli_args)
}

/// Like [`load_config`], but falls back to defaults when no file is found by search.
///
/// An explicit `config_path` or `BRANDPRESS_CONFIG_PATH` that does not exist is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrandpressConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV).is_err() => {
            finish(BrandpressConfig::default(), cli_args)
        }
        Err(e) => Err(e),
    }
}

fn finish(
    mut config: BrandpressConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrandpressConfig> {
    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }
    validate_config(&config)?;
    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `BRANDPRESS_CODEC_COMPRESS` -> `codec.compress`
/// - `BRANDPRESS_CODEC_LEVEL` -> `codec.compression_level`
/// - `BRANDPRESS_CODEC_MAX_PAYLOAD_BYTES` -> `codec.max_payload_bytes`
/// - `BRANDPRESS_CODEC_MAX_DEPTH` -> `codec.max_depth`
/// - `BRANDPRESS_LOG_LEVEL` -> `logging.level`
/// - `BRANDPRESS_LOG_FORMAT` -> `logging.format`
/// - `BRANDPRESS_BLOB_DIR` -> `storage.blob_dir`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut BrandpressConfig) {
    if let Ok(value) = env::var("BRANDPRESS_CODEC_COMPRESS") {
        config.codec.compress = parse_flag(&value);
    }
    if let Ok(value) = env::var("BRANDPRESS_CODEC_LEVEL") {
        if let Ok(level) = value.parse::<u32>() {
            config.codec.compression_level = level;
        }
    }
    if let Ok(value) = env::var("BRANDPRESS_CODEC_MAX_PAYLOAD_BYTES") {
        if let Ok(limit) = value.parse::<usize>() {
            config.codec.max_payload_bytes = limit;
        }
    }
    if let Ok(value) = env::var("BRANDPRESS_CODEC_MAX_DEPTH") {
        if let Ok(depth) = value.parse::<usize>() {
            config.codec.max_depth = depth;
        }
    }

    if let Ok(value) = env::var("BRANDPRESS_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("BRANDPRESS_LOG_FORMAT") {
        if let Ok(format) = value.parse() {
            config.logging.format = format;
        }
    }

    if let Ok(value) = env::var("BRANDPRESS_BLOB_DIR") {
        config.storage.blob_dir = PathBuf::from(value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"compress": "true", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut BrandpressConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("compress") {
        config.codec.compress = parse_flag(value);
    }
    if let Some(value) = cli_args.get("compression_level") {
        if let Ok(level) = value.parse::<u32>() {
            config.codec.compression_level = level;
        }
    }
    if let Some(value) = cli_args.get("max_payload_bytes") {
        if let Ok(limit) = value.parse::<usize>() {
            config.codec.max_payload_bytes = limit;
        }
    }
    if let Some(value) = cli_args.get("max_depth") {
        if let Ok(depth) = value.parse::<usize>() {
            config.codec.max_depth = depth;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        if let Ok(format) = value.parse() {
            config.logging.format = format;
        }
    }
    if let Some(value) = cli_args.get("blob_dir") {
        config.storage.blob_dir = PathBuf::from(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: &[&str] = &[
        "BRANDPRESS_CODEC_COMPRESS",
        "BRANDPRESS_CODEC_LEVEL",
        "BRANDPRESS_CODEC_MAX_PAYLOAD_BYTES",
        "BRANDPRESS_CODEC_MAX_DEPTH",
        "BRANDPRESS_LOG_LEVEL",
        "BRANDPRESS_LOG_FORMAT",
        "BRANDPRESS_BLOB_DIR",
    ];

    fn clear_override_vars() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_missing_env_path_is_an_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        env::set_var(CONFIG_PATH_ENV, dir.path().join("nope.toml"));
        let result = load_config_or_default(None, None);
        env::remove_var(CONFIG_PATH_ENV);

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[codec]").unwrap();
        writeln!(file, "compress = true").unwrap();
        writeln!(file, "compression_level = 6").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "format = \"json\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();
        assert!(config.codec.compress);
        assert_eq!(config.codec.compression_level, 6);
        assert_eq!(config.codec.max_depth, 512); // default kept
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_then_cli_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[codec]\ncompression_level = 3\n").unwrap();

        env::set_var("BRANDPRESS_CODEC_LEVEL", "5");
        env::set_var("BRANDPRESS_CODEC_COMPRESS", "yes");
        env::set_var("BRANDPRESS_BLOB_DIR", "/var/lib/brandpress");

        let mut cli_args = HashMap::new();
        cli_args.insert("compression_level".to_string(), "1".to_string());
        cli_args.insert("log_level".to_string(), "debug".to_string());

        let result = load_config(Some(&config_path), Some(&cli_args));
        clear_override_vars();

        let config = result.unwrap();
        assert_eq!(config.codec.compression_level, 1);
        assert!(config.codec.compress);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.blob_dir, PathBuf::from("/var/lib/brandpress"));
    }

    #[test]
    fn test_invalid_toml() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[codec\ncompress = ").unwrap();

        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[codec]\ncompression_level = 4\n").unwrap();

        let mut cli_args = HashMap::new();
        cli_args.insert("compression_level".to_string(), "12".to_string());

        assert!(matches!(
            load_config(Some(&config_path), Some(&cli_args)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
