// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::compression::MAX_COMPRESSION_LEVEL;

/// Knobs for [`encode_with`](crate::encode_with) and [`decode_with`](crate::decode_with).
///
/// The defaults match [`encode`](crate::encode) / [`decode`](crate::decode):
/// no compression, level 9 when compressing, no size ceiling and a nesting
/// ceiling of [`CodecOptions::DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Compress the payload on encode
    pub compress: bool,
    /// zlib level 0-9
    pub compression_level: u32,
    /// Ceiling on the decompressed payload size when decoding
    pub max_payload_bytes: Option<usize>,
    /// Deepest List/Map nesting accepted by both encode and decode
    pub max_depth: usize,
}

impl CodecOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(MAX_COMPRESSION_LEVEL);
        self
    }

    pub fn with_max_payload_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_payload_bytes = limit;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            compress: false,
            compression_level: MAX_COMPRESSION_LEVEL,
            max_payload_bytes: None,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let options = CodecOptions::default();
        assert!(!options.compress);
        assert_eq!(options.compression_level, 9);
        assert_eq!(options.max_payload_bytes, None);
        assert_eq!(options.max_depth, 512);

        let options = options
            .with_compression(true)
            .with_compression_level(42)
            .with_max_payload_bytes(Some(1024))
            .with_max_depth(8);
        assert!(options.compress);
        assert_eq!(options.compression_level, MAX_COMPRESSION_LEVEL);
        assert_eq!(options.max_payload_bytes, Some(1024));
        assert_eq!(options.max_depth, 8);
    }
}
