// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Buffer to value decoding.

use crate::compression::decompress_deflate;
use crate::format::{Header, SizeClass, TypeTag, WidthClass, HEADER_SIZE};
use crate::{CodecError, CodecOptions, Result, Value};
use byteorder::{ByteOrder, LittleEndian};
use std::borrow::Cow;

/// Decodes a buffer produced by [`encode`](crate::encode).
///
/// Compression is detected from the header flag. Any defect in the buffer aborts
/// the whole decode; no partial value is returned.
///
/// # Example
/// ```
/// use brandpress_codec::{decode, CodecError, Value};
///
/// assert_eq!(decode(&[1, 0, 0x01, 1]).unwrap(), Value::Bool(true));
/// assert!(matches!(decode(&[2, 0, 0x00]), Err(CodecError::ProtocolVersion { .. })));
/// assert!(matches!(decode(&[1, 0, 0x04, 3, b'a']), Err(CodecError::MalformedData(_))));
/// ```
pub fn decode(buffer: &[u8]) -> Result<Value> {
    decode_with(buffer, &CodecOptions::default())
}

/// Decodes a buffer, enforcing the size and nesting ceilings in `options`.
pub fn decode_with(buffer: &[u8], options: &CodecOptions) -> Result<Value> {
    let header = Header::parse(buffer)?;
    let body = &buffer[HEADER_SIZE..];

    let payload: Cow<[u8]> = if header.is_compressed() {
        Cow::Owned(decompress_deflate(body, options.max_payload_bytes)?)
    } else {
        if let Some(limit) = options.max_payload_bytes {
            if body.len() > limit {
                return Err(CodecError::MalformedData(format!(
                    "Payload of {} bytes exceeds the {} byte limit",
                    body.len(),
                    limit
                )));
            }
        }
        Cow::Borrowed(body)
    };

    let mut reader = PayloadReader::new(&payload, options.max_depth);
    let value = reader.read_value(0)?;
    if reader.remaining() != 0 {
        return Err(CodecError::MalformedData(format!(
            "{} trailing bytes after the top level item",
            reader.remaining()
        )));
    }
    Ok(value)
}

/// Validates and returns the header without touching the payload.
///
/// # Example
/// ```
/// use brandpress_codec::{encode, peek_header, Value};
///
/// let bytes = encode(&Value::Null, true).unwrap();
/// assert!(peek_header(&bytes).unwrap().is_compressed());
/// ```
pub fn peek_header(buffer: &[u8]) -> Result<Header> {
    Header::parse(buffer)
}

/// Cursor over an uncompressed payload
struct PayloadReader<'a> {
    bytes: &'a [u8],
    read_pos: usize,
    max_depth: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(bytes: &'a [u8], max_depth: usize) -> Self {
        Self {
            bytes,
            read_pos: 0,
            max_depth,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.read_pos
    }

    fn take(&mut self, count: usize, what: &str) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(CodecError::MalformedData(format!(
                "{} needs {} bytes at position {} but only {} remain",
                what,
                count,
                self.read_pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.read_pos..self.read_pos + count];
        self.read_pos += count;
        Ok(slice)
    }

    fn read_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        let tag_byte = self.read_u8("Type tag")?;
        let tag = TypeTag::try_from(tag_byte)?;
        let class = TypeTag::class_of(tag_byte);

        if !tag.is_sized() && tag != TypeTag::Integer && class != 0 {
            return Err(CodecError::MalformedData(format!(
                "{} tag {:#04x} carries a class nibble",
                tag, tag_byte
            )));
        }

        match tag {
            TypeTag::Null => Ok(Value::Null),
            TypeTag::Bool => match self.read_u8("Bool")? {
                0 => Ok(Value::Bool(false)),
                1 => Ok(Value::Bool(true)),
                other => Err(CodecError::MalformedData(format!(
                    "Bool byte must be 0 or 1, found {}",
                    other
                ))),
            },
            TypeTag::Integer => self.read_integer(WidthClass::try_from(class)?),
            TypeTag::Float => Ok(Value::Float(LittleEndian::read_f64(
                self.take(8, "Float")?,
            ))),
            TypeTag::Text => {
                let len = self.read_len(class, "Text")?;
                let raw = self.take(len, "Text")?;
                let text = std::str::from_utf8(raw).map_err(|e| {
                    CodecError::MalformedData(format!("Text is not valid UTF-8: {}", e))
                })?;
                Ok(Value::Text(text.to_string()))
            }
            TypeTag::Bytes => {
                let len = self.read_len(class, "Bytes")?;
                Ok(Value::Bytes(self.take(len, "Bytes")?.to_vec()))
            }
            TypeTag::List => {
                let count = self.read_len(class, "List")?;
                self.check_container(depth, count, 1, "List")?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read_value(depth + 1)?);
                }
                Ok(Value::List(items))
            }
            TypeTag::Map => {
                let count = self.read_len(class, "Map")?;
                self.check_container(depth, count, 2, "Map")?;
                let mut pairs = Vec::with_capacity(count);
                for _ in 0..count {
                    let key = self.read_value(depth + 1)?;
                    let value = self.read_value(depth + 1)?;
                    pairs.push((key, value));
                }
                Ok(Value::Map(pairs))
            }
        }
    }

    fn read_integer(&mut self, width: WidthClass) -> Result<Value> {
        let raw = self.take(width.byte_len(), "Integer")?;
        let value = match width {
            WidthClass::W1 => raw[0] as i8 as i64,
            WidthClass::W2 => LittleEndian::read_i16(raw) as i64,
            WidthClass::W4 => LittleEndian::read_i32(raw) as i64,
            WidthClass::W8 => LittleEndian::read_i64(raw),
        };
        Ok(Value::Integer(value))
    }

    fn read_len(&mut self, class: u8, what: &str) -> Result<usize> {
        match SizeClass::try_from(class)? {
            SizeClass::Short => Ok(self.read_u8(what)? as usize),
            SizeClass::Long => Ok(LittleEndian::read_u32(self.take(4, what)?) as usize),
        }
    }

    /// Rejects containers nested too deep or declaring more entries than bytes remain
    fn check_container(
        &self,
        depth: usize,
        count: usize,
        min_entry_bytes: usize,
        what: &str,
    ) -> Result<()> {
        if depth + 1 > self.max_depth {
            return Err(CodecError::MalformedData(format!(
                "{} nesting exceeds the maximum depth of {}",
                what, self.max_depth
            )));
        }
        if count.saturating_mul(min_entry_bytes) > self.remaining() {
            return Err(CodecError::MalformedData(format!(
                "{} declares {} entries but only {} bytes remain",
                what,
                count,
                self.remaining()
            )));
        }
        Ok(())
    }
}
