//! Summaries of encoded buffers for tooling.

use crate::codec::{decode_with, encoded_len, peek_header, CodecOptions, Header, Result, TypeTag, Value};
use std::fmt::{Display, Formatter};

/// What a buffer holds, without printing the value itself
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSummary {
    pub header: Header,
    /// Size of the buffer as stored, header included
    pub stored_bytes: usize,
    /// Size of the payload once decompressed
    pub payload_bytes: usize,
    pub top_level: TypeTag,
    /// Every value counted, nested ones included
    pub value_count: usize,
    /// 0 for scalars, 1 for a flat list or map, and so on
    pub depth: usize,
}

impl BufferSummary {
    /// Decodes `buffer` and describes it. Fails exactly when decoding fails.
    pub fn from_buffer(buffer: &[u8], options: &CodecOptions) -> Result<Self> {
        let header = peek_header(buffer)?;
        let value = decode_with(buffer, options)?;
        Ok(Self {
            header,
            stored_bytes: buffer.len(),
            payload_bytes: encoded_len(&value),
            top_level: value.type_tag(),
            value_count: count_values(&value),
            depth: depth_of(&value),
        })
    }
}

impl Display for BufferSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "version:    {}", self.header.version)?;
        writeln!(
            f,
            "compressed: {}",
            if self.header.is_compressed() { "yes" } else { "no" }
        )?;
        writeln!(f, "stored:     {} bytes", self.stored_bytes)?;
        writeln!(f, "payload:    {} bytes", self.payload_bytes)?;
        writeln!(f, "top level:  {}", self.top_level)?;
        writeln!(f, "values:     {}", self.value_count)?;
        write!(f, "depth:      {}", self.depth)
    }
}

fn count_values(value: &Value) -> usize {
    1 + match value {
        Value::List(items) => items.iter().map(count_values).sum(),
        Value::Map(pairs) => pairs
            .iter()
            .map(|(k, v)| count_values(k) + count_values(v))
            .sum(),
        _ => 0,
    }
}

fn depth_of(value: &Value) -> usize {
    match value {
        Value::List(items) => 1 + items.iter().map(depth_of).max().unwrap_or(0),
        Value::Map(pairs) => {
            1 + pairs
                .iter()
                .map(|(k, v)| depth_of(k).max(depth_of(v)))
                .max()
                .unwrap_or(0)
        }
        _ => 0,
    }
}
