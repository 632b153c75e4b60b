//! JSON text in and out of [`Value`](crate::codec::Value).
//!
//! Used by the `bpcodec` tool; bytes are shown as base64 on the way out and
//! cannot be told apart from text on the way back in.

use crate::codec::Value;
use anyhow::{Context, Result};

/// Parses JSON text into a value. Objects become maps in document order.
pub fn parse_json(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text).context("Input is not valid JSON")?;
    Ok(Value::from(json))
}

/// Renders a value as JSON text.
pub fn render_json(value: &Value, pretty: bool) -> Result<String> {
    let json = value.to_json();
    let text = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    text.context("Failed to render value as JSON")
}
