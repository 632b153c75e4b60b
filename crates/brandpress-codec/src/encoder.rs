// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Value to buffer encoding.

use crate::compression::compress_deflate;
use crate::format::{Header, SizeClass, TypeTag, WidthClass, HEADER_SIZE};
use crate::{CodecError, CodecOptions, Result, Value};
use byteorder::{ByteOrder, LittleEndian};

/// Encodes a value into a standalone buffer.
///
/// With `compress` set, the payload is zlib compressed at maximum level and the
/// header flag is raised so [`decode`](crate::decode) can detect it.
///
/// # Example
/// ```
/// use brandpress_codec::{encode, Value};
///
/// let bytes = encode(&Value::from(true), false).unwrap();
/// assert_eq!(bytes, vec![1, 0, 0x01, 1]);
///
/// let bytes = encode(&Value::from(1), false).unwrap();
/// assert_eq!(bytes, vec![1, 0, 0x02, 1]);
/// ```
pub fn encode(value: &Value, compress: bool) -> Result<Vec<u8>> {
    encode_with(value, &CodecOptions::default().with_compression(compress))
}

/// Encodes a value using the compression settings in `options`.
///
/// Values nested deeper than `options.max_depth` are refused before anything is
/// written, so every buffer this returns decodes under the same options.
pub fn encode_with(value: &Value, options: &CodecOptions) -> Result<Vec<u8>> {
    check_depth(value, 0, options.max_depth)?;
    let payload_len = encoded_len(value);
    let header = Header::new(options.compress);

    if !options.compress {
        let mut output = Vec::with_capacity(HEADER_SIZE + payload_len);
        output.extend_from_slice(&header.to_bytes());
        write_value(&mut output, value)?;
        return Ok(output);
    }

    let mut payload = Vec::with_capacity(payload_len);
    write_value(&mut payload, value)?;
    let compressed = compress_deflate(&payload, options.compression_level)?;

    let mut output = Vec::with_capacity(HEADER_SIZE + compressed.len());
    output.extend_from_slice(&header.to_bytes());
    output.extend_from_slice(&compressed);
    Ok(output)
}

/// Number of payload bytes `value` occupies before compression, header excluded.
///
/// # Example
/// ```
/// use brandpress_codec::{encoded_len, Value};
///
/// assert_eq!(encoded_len(&Value::Null), 1);
/// assert_eq!(encoded_len(&Value::from(300)), 3);
/// assert_eq!(encoded_len(&Value::from("hey")), 5);
/// ```
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Null => 1,
        Value::Bool(_) => 2,
        Value::Integer(i) => 1 + WidthClass::for_value(*i).byte_len(),
        Value::Float(_) => 9,
        Value::Text(s) | Value::Other(s) => sized_len(s.len()) + s.len(),
        Value::Bytes(b) => sized_len(b.len()) + b.len(),
        Value::List(items) => {
            sized_len(items.len()) + items.iter().map(encoded_len).sum::<usize>()
        }
        Value::Map(pairs) => {
            sized_len(pairs.len())
                + pairs
                    .iter()
                    .map(|(k, v)| encoded_len(k) + encoded_len(v))
                    .sum::<usize>()
        }
    }
}

// Same accounting as the decoder: a container at `depth` needs `depth + 1 <= max_depth`.
fn check_depth(value: &Value, depth: usize, max_depth: usize) -> Result<()> {
    let tag = match value {
        Value::List(_) => TypeTag::List,
        Value::Map(_) => TypeTag::Map,
        _ => return Ok(()),
    };
    if depth + 1 > max_depth {
        return Err(CodecError::UnsupportedType(format!(
            "{} nesting exceeds the maximum depth of {}",
            tag, max_depth
        )));
    }
    match value {
        Value::List(items) => items
            .iter()
            .try_for_each(|item| check_depth(item, depth + 1, max_depth)),
        Value::Map(pairs) => pairs.iter().try_for_each(|(key, item)| {
            check_depth(key, depth + 1, max_depth)?;
            check_depth(item, depth + 1, max_depth)
        }),
        _ => Ok(()),
    }
}

fn sized_len(len: usize) -> usize {
    1 + SizeClass::for_len(len).map_or(4, SizeClass::prefix_len)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Null => out.push(TypeTag::Null as u8),
        Value::Bool(b) => {
            out.push(TypeTag::Bool as u8);
            out.push(u8::from(*b));
        }
        Value::Integer(i) => write_integer(out, *i),
        Value::Float(f) => {
            out.push(TypeTag::Float as u8);
            let mut scratch = [0u8; 8];
            LittleEndian::write_f64(&mut scratch, *f);
            out.extend_from_slice(&scratch);
        }
        Value::Text(s) | Value::Other(s) => {
            write_sized_header(out, TypeTag::Text, s.len())?;
            out.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            write_sized_header(out, TypeTag::Bytes, b.len())?;
            out.extend_from_slice(b);
        }
        Value::List(items) => {
            write_sized_header(out, TypeTag::List, items.len())?;
            for item in items {
                write_value(out, item)?;
            }
        }
        Value::Map(pairs) => {
            write_sized_header(out, TypeTag::Map, pairs.len())?;
            for (key, item) in pairs {
                write_value(out, key)?;
                write_value(out, item)?;
            }
        }
    }
    Ok(())
}

fn write_integer(out: &mut Vec<u8>, value: i64) {
    let width = WidthClass::for_value(value);
    out.push(TypeTag::Integer.with_class(width as u8));

    let mut scratch = [0u8; 8];
    match width {
        WidthClass::W1 => scratch[0] = value as i8 as u8,
        WidthClass::W2 => LittleEndian::write_i16(&mut scratch, value as i16),
        WidthClass::W4 => LittleEndian::write_i32(&mut scratch, value as i32),
        WidthClass::W8 => LittleEndian::write_i64(&mut scratch, value),
    }
    out.extend_from_slice(&scratch[..width.byte_len()]);
}

fn write_sized_header(out: &mut Vec<u8>, tag: TypeTag, len: usize) -> Result<()> {
    let size_class = SizeClass::for_len(len).ok_or_else(|| {
        CodecError::UnsupportedType(format!(
            "{} of length {} does not fit a 4 byte length prefix",
            tag, len
        ))
    })?;
    out.push(tag.with_class(size_class as u8));
    match size_class {
        SizeClass::Short => out.push(len as u8),
        SizeClass::Long => {
            let mut scratch = [0u8; 4];
            LittleEndian::write_u32(&mut scratch, len as u32);
            out.extend_from_slice(&scratch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_bytes_are_little_endian() {
        let bytes = encode(&Value::from(-2i64), false).unwrap();
        assert_eq!(bytes, vec![1, 0, 0x02, 0xFE]);

        let bytes = encode(&Value::from(0x1234), false).unwrap();
        assert_eq!(bytes, vec![1, 0, 0x12, 0x34, 0x12]);

        let bytes = encode(&Value::from(i64::MIN), false).unwrap();
        assert_eq!(bytes[2], 0x32);
        assert_eq!(&bytes[3..], &[0, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn test_long_text_uses_four_byte_prefix() {
        let text = "a".repeat(300);
        let bytes = encode(&Value::from(text.as_str()), false).unwrap();
        assert_eq!(bytes[2], 0x14);
        assert_eq!(&bytes[3..7], &300u32.to_le_bytes());
        assert_eq!(bytes.len(), 2 + 5 + 300);
    }

    #[test]
    fn test_other_is_written_as_text() {
        let as_other = encode(&Value::Other("[1,2]".into()), false).unwrap();
        let as_text = encode(&Value::from("[1,2]"), false).unwrap();
        assert_eq!(as_other, as_text);
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let value = Value::map([
            ("title", Value::from("Launch day")),
            ("views", Value::from(70_000)),
            ("tags", Value::list(["north", "voice"])),
            ("cover", Value::bytes(vec![0u8; 400])),
        ]);
        let bytes = encode(&value, false).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + encoded_len(&value));
    }

    #[test]
    fn test_depth_limit_matches_decoder() {
        let mut nested = Value::Null;
        for _ in 0..3 {
            nested = Value::List(vec![nested]);
        }
        nested = Value::map([("inner", nested)]);

        let too_shallow = CodecOptions::default().with_max_depth(3);
        assert!(matches!(
            encode_with(&nested, &too_shallow),
            Err(CodecError::UnsupportedType(_))
        ));

        let exact = CodecOptions::default().with_max_depth(4);
        let bytes = encode_with(&nested, &exact).unwrap();
        assert_eq!(crate::decode_with(&bytes, &exact).unwrap(), nested);
    }

    #[test]
    fn test_zero_depth_allows_only_scalars() {
        let options = CodecOptions::default().with_max_depth(0);
        assert!(encode_with(&Value::from("flat"), &options).is_ok());
        assert!(encode_with(&Value::list([1]), &options).is_err());
    }

    #[test]
    fn test_compressed_flag_set() {
        let bytes = encode(&Value::from("x".repeat(1000)), true).unwrap();
        assert_eq!(bytes[1], 1);
        assert!(bytes.len() < 1000);
    }
}
