// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! zlib (DEFLATE) compression of encoded payloads

use crate::{CodecError, Result};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

/// Highest zlib compression level, used unless configured otherwise
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Compress a payload as a zlib stream
///
/// # Arguments
/// - `data`: Encoded payload bytes
/// - `level`: zlib level 0-9, clamped
pub fn compress_deflate(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level.min(MAX_COMPRESSION_LEVEL)),
    );
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a zlib stream, requiring it to be complete
///
/// # Arguments
/// - `compressed`: zlib stream, nothing may follow it
/// - `max_size`: Ceiling on the decompressed size (`None` for no ceiling)
///
/// # Errors
/// `MalformedData` if the stream is corrupt, truncated, followed by trailing
/// bytes, or inflates past `max_size`.
pub fn decompress_deflate(compressed: &[u8], max_size: Option<usize>) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(compressed.len().saturating_mul(4).max(64));

    loop {
        let consumed_before = inflater.total_in();
        let produced_before = inflater.total_out();
        let remaining = &compressed[consumed_before as usize..];

        let status = inflater
            .decompress_vec(remaining, &mut output, FlushDecompress::Finish)
            .map_err(|e| CodecError::MalformedData(format!("Corrupt compressed payload: {}", e)))?;

        if let Some(limit) = max_size {
            if output.len() > limit {
                return Err(CodecError::MalformedData(format!(
                    "Compressed payload inflates past the {} byte limit",
                    limit
                )));
            }
        }

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if output.len() == output.capacity() {
                    output.reserve(output.capacity());
                    continue;
                }
                let made_progress = inflater.total_in() != consumed_before
                    || inflater.total_out() != produced_before;
                if !made_progress || inflater.total_in() as usize == compressed.len() {
                    return Err(CodecError::MalformedData(
                        "Compressed payload ends before the end of its stream".into(),
                    ));
                }
            }
        }
    }

    if (inflater.total_in() as usize) < compressed.len() {
        return Err(CodecError::MalformedData(format!(
            "{} trailing bytes after the compressed payload",
            compressed.len() - inflater.total_in() as usize
        )));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let data = vec![42u8; 10_000]; // Highly compressible
        let compressed = compress_deflate(&data, MAX_COMPRESSION_LEVEL).unwrap();
        assert!(compressed.len() < data.len());

        let decompressed = decompress_deflate(&compressed, None).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let compressed = compress_deflate(b"hello hello hello", MAX_COMPRESSION_LEVEL).unwrap();
        for cut in 0..compressed.len() {
            assert!(
                decompress_deflate(&compressed[..cut], None).is_err(),
                "stream cut at {} was accepted",
                cut
            );
        }
    }

    #[test]
    fn test_size_limit() {
        let compressed = compress_deflate(&[0u8; 4096], MAX_COMPRESSION_LEVEL).unwrap();
        assert!(decompress_deflate(&compressed, Some(1024)).is_err());
        assert_eq!(decompress_deflate(&compressed, Some(4096)).unwrap().len(), 4096);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut compressed = compress_deflate(b"payload", MAX_COMPRESSION_LEVEL).unwrap();
        compressed.push(0);
        assert!(decompress_deflate(&compressed, None).is_err());
    }
}
