// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Brandpress Codec
//!
//! Compact, self-describing binary encoding for the dynamically-typed values the
//! platform passes around (post metadata, memo transcripts, newsletter fragments).
//!
//! ## Design Goals
//! - **Compact**: small integers, strings and collections cost one extra byte
//! - **Self-describing**: every item carries its own type tag
//! - **Version-safe**: a single version byte, anything else is rejected
//! - **Pure**: no state is kept between calls, safe to use from any thread
//!
//! ## Usage
//! ```rust
//! use brandpress_codec::{decode, encode, Value};
//!
//! let profile = Value::map([
//!     ("name", Value::from("Alice")),
//!     ("age", Value::from(30)),
//!     ("active", Value::from(true)),
//! ]);
//!
//! let bytes = encode(&profile, true).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), profile);
//! ```
//!
//! ## Format
//! ```text
//! [Header]
//! - Version: u8 (currently 1)
//! - Flags: u8 - bit 0: payload is zlib compressed
//! [Payload]
//! - Exactly one item: tag byte (low nibble = type, high nibble = width class)
//!   followed by the type specific body
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use thiserror::Error;

mod compression;
mod decoder;
mod encoder;
mod format;
mod options;
mod persist;
mod value;

pub use compression::MAX_COMPRESSION_LEVEL;
pub use decoder::{decode, decode_with, peek_header};
pub use encoder::{encode, encode_with, encoded_len};
pub use format::{Header, SizeClass, TypeTag, WidthClass, FLAG_COMPRESSED, HEADER_SIZE, PROTOCOL_VERSION};
pub use options::CodecOptions;
pub use persist::{load_value, save_value};
pub use value::Value;

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported protocol version: buffer version {found}, expected {expected}")]
    ProtocolVersion { found: u8, expected: u8 },

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
