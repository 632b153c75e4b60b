// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `brandpress.toml`.

use brandpress_codec::{CodecOptions, MAX_COMPRESSION_LEVEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BrandpressConfig {
    pub codec: CodecSettings,
    pub logging: LoggingSettings,
    pub storage: StorageSettings,
}

/// Binary codec settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Compress payloads when encoding
    pub compress: bool,
    /// zlib level, 0-9
    pub compression_level: u32,
    /// Decode ceiling for the (decompressed) payload, 0 = unlimited
    pub max_payload_bytes: usize,
    pub max_depth: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            compress: false,
            compression_level: MAX_COMPRESSION_LEVEL,
            max_payload_bytes: 0,
            max_depth: CodecOptions::DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecSettings {
    pub fn to_codec_options(&self) -> CodecOptions {
        CodecOptions::default()
            .with_compression(self.compress)
            .with_compression_level(self.compression_level)
            .with_max_payload_bytes(match self.max_payload_bytes {
                0 => None,
                limit => Some(limit),
            })
            .with_max_depth(self.max_depth)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Where encoded blobs are read from and written to
///
/// Relative blob paths given to the tools are taken relative to `blob_dir`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    pub blob_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            blob_dir: PathBuf::from("./blobs"),
        }
    }
}

impl StorageSettings {
    /// Absolute paths are kept as given, relative ones land under `blob_dir`.
    pub fn blob_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.blob_dir.join(path)
        }
    }
}
