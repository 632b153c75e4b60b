// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Installs a global `tracing` subscriber writing to stderr, as text or JSON.

use anyhow::{anyhow, Context, Result};
use brandpress_config::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Filter directives for the given settings.
///
/// `RUST_LOG`, when set, replaces everything else.
pub fn filter_directives(settings: &LoggingSettings, debug_flags: &CrateDebugFlags) -> String {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => directives,
        _ => debug_flags.to_filter_string(&settings.level),
    }
}

/// Initialize logging for a binary
///
/// # Arguments
/// * `settings` - Level and format from the `[logging]` config section
/// * `debug_flags` - Per-crate debug flags, raised to `debug` regardless of level
///
/// # Errors
/// Fails if the filter does not parse or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings, debug_flags: &CrateDebugFlags) -> Result<()> {
    let directives = filter_directives(settings, debug_flags);
    let env_filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter '{}'", directives))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(debug_flags.any_enabled());

    let installed = match settings.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!(filter = %directives, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_parse() {
        let settings = LoggingSettings {
            level: "warn".to_string(),
            format: LogFormat::Json,
        };
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        let directives = flags.to_filter_string(&settings.level);
        assert!(EnvFilter::try_new(&directives).is_ok());
        assert!(directives.contains("brandpress_codec=debug"));
        assert!(directives.ends_with("warn"));
    }
}
