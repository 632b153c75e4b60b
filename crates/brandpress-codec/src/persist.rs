// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Writing encoded values to disk and reading them back.
//!
//! The file holds the encoded buffer verbatim, so the same bytes can be moved
//! into a database BLOB column unchanged.

use crate::{decode_with, encode_with, CodecOptions, Result, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Save a value to a file
///
/// # Arguments
/// * `path` - File path to write to (created or truncated)
/// * `value` - Value to encode
/// * `options` - Compression settings for the encode
///
/// # Returns
/// Number of bytes written
pub fn save_value<P: AsRef<Path>>(path: P, value: &Value, options: &CodecOptions) -> Result<usize> {
    let path = path.as_ref();
    if value.contains_other() {
        warn!(
            path = %path.display(),
            "value contains JSON fallback text; it will load back as Text"
        );
    }

    let bytes = encode_with(value, options)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        compressed = options.compress,
        "saved value"
    );
    Ok(bytes.len())
}

/// Load a value from a file written by [`save_value`]
///
/// Compression is detected from the header; the size and depth ceilings of
/// `options` apply.
pub fn load_value<P: AsRef<Path>>(path: P, options: &CodecOptions) -> Result<Value> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let value = decode_with(&bytes, options)?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded value");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_load_roundtrip() {
        let memo = Value::map([
            ("brand", Value::from("harbor")),
            ("duration_ms", Value::from(83_250)),
            ("transcript", Value::from("Morning notes on the launch")),
            ("audio", Value::bytes(vec![1u8, 2, 3, 4])),
        ]);

        for compress in [false, true] {
            let temp_file = NamedTempFile::new().unwrap();
            let options = CodecOptions::default().with_compression(compress);
            let written = save_value(temp_file.path(), &memo, &options).unwrap();
            assert_eq!(written as u64, temp_file.path().metadata().unwrap().len());

            let loaded = load_value(temp_file.path(), &CodecOptions::default()).unwrap();
            assert_eq!(loaded, memo);
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_value(dir.path().join("absent.bin"), &CodecOptions::default());
        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_is_malformed() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[1, 0, 0x06, 3, 0x00]).unwrap();
        let result = load_value(temp_file.path(), &CodecOptions::default());
        assert!(matches!(result, Err(CodecError::MalformedData(_))));
    }
}
