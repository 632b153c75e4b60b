// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wire format constants and the tag byte layout.

use crate::{CodecError, Result};
use std::fmt::{Display, Formatter};

/// Current (and only) protocol version
pub const PROTOCOL_VERSION: u8 = 1;

/// Header: version (1 byte) + flags (1 byte)
pub const HEADER_SIZE: usize = 2;

/// Flag bit 0: the payload after the header is zlib compressed
pub const FLAG_COMPRESSED: u8 = 0b0000_0001;

const TYPE_MASK: u8 = 0x0F;
const CLASS_SHIFT: u8 = 4;

/// Base type of an item, stored in the low nibble of the tag byte.
///
/// # Example
/// ```
/// use brandpress_codec::TypeTag;
///
/// assert_eq!(TypeTag::Text as u8, 4);
/// assert_eq!(TypeTag::try_from(0x17u8).unwrap(), TypeTag::Map);
/// assert!(TypeTag::try_from(0x0Au8).is_err());
/// ```
#[repr(u8)]
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum TypeTag {
    Null = 0x0,
    Bool = 0x1,
    Integer = 0x2,
    Float = 0x3,
    Text = 0x4,
    Bytes = 0x5,
    List = 0x6,
    Map = 0x7,
}

impl TypeTag {
    /// Extracts the class stored in the high nibble of a tag byte
    pub fn class_of(tag_byte: u8) -> u8 {
        tag_byte >> CLASS_SHIFT
    }

    /// Builds a full tag byte from this type and a class nibble
    pub fn with_class(self, class: u8) -> u8 {
        (class << CLASS_SHIFT) | self as u8
    }

    /// Variable length types carry a [`SizeClass`] in their high nibble
    pub fn is_sized(self) -> bool {
        matches!(
            self,
            TypeTag::Text | TypeTag::Bytes | TypeTag::List | TypeTag::Map
        )
    }
}

/// Accepts a full tag byte and looks only at the low nibble
impl TryFrom<u8> for TypeTag {
    type Error = CodecError;
    fn try_from(value: u8) -> Result<Self> {
        match value & TYPE_MASK {
            0x0 => Ok(TypeTag::Null),
            0x1 => Ok(TypeTag::Bool),
            0x2 => Ok(TypeTag::Integer),
            0x3 => Ok(TypeTag::Float),
            0x4 => Ok(TypeTag::Text),
            0x5 => Ok(TypeTag::Bytes),
            0x6 => Ok(TypeTag::List),
            0x7 => Ok(TypeTag::Map),
            other => Err(CodecError::MalformedData(format!(
                "Unknown type tag {:#04x}",
                other
            ))),
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeTag::Null => "Null",
            TypeTag::Bool => "Bool",
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::Text => "Text",
            TypeTag::Bytes => "Bytes",
            TypeTag::List => "List",
            TypeTag::Map => "Map",
        };
        write!(f, "{name}")
    }
}

/// Length prefix width for Text, Bytes, List and Map items.
#[repr(u8)]
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum SizeClass {
    /// 1 byte unsigned length
    Short = 0x0,
    /// 4 byte unsigned little endian length
    Long = 0x1,
}

impl SizeClass {
    /// Smallest class able to hold `len`, `None` if it does not fit a u32
    pub fn for_len(len: usize) -> Option<SizeClass> {
        if len <= u8::MAX as usize {
            Some(SizeClass::Short)
        } else if len <= u32::MAX as usize {
            Some(SizeClass::Long)
        } else {
            None
        }
    }

    pub fn prefix_len(self) -> usize {
        match self {
            SizeClass::Short => 1,
            SizeClass::Long => 4,
        }
    }
}

impl TryFrom<u8> for SizeClass {
    type Error = CodecError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x0 => Ok(SizeClass::Short),
            0x1 => Ok(SizeClass::Long),
            other => Err(CodecError::MalformedData(format!(
                "Unknown size class {}",
                other
            ))),
        }
    }
}

/// Byte width of an Integer item, stored in the high nibble of its tag.
#[repr(u8)]
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum WidthClass {
    W1 = 0b00,
    W2 = 0b01,
    W4 = 0b10,
    W8 = 0b11,
}

impl WidthClass {
    /// Smallest width that holds `value` without loss
    ///
    /// # Example
    /// ```
    /// use brandpress_codec::WidthClass;
    ///
    /// assert_eq!(WidthClass::for_value(127), WidthClass::W1);
    /// assert_eq!(WidthClass::for_value(128), WidthClass::W2);
    /// assert_eq!(WidthClass::for_value(-32769), WidthClass::W4);
    /// assert_eq!(WidthClass::for_value(2_147_483_648), WidthClass::W8);
    /// ```
    pub fn for_value(value: i64) -> WidthClass {
        if i8::try_from(value).is_ok() {
            WidthClass::W1
        } else if i16::try_from(value).is_ok() {
            WidthClass::W2
        } else if i32::try_from(value).is_ok() {
            WidthClass::W4
        } else {
            WidthClass::W8
        }
    }

    pub fn byte_len(self) -> usize {
        match self {
            WidthClass::W1 => 1,
            WidthClass::W2 => 2,
            WidthClass::W4 => 4,
            WidthClass::W8 => 8,
        }
    }
}

impl TryFrom<u8> for WidthClass {
    type Error = CodecError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0b00 => Ok(WidthClass::W1),
            0b01 => Ok(WidthClass::W2),
            0b10 => Ok(WidthClass::W4),
            0b11 => Ok(WidthClass::W8),
            other => Err(CodecError::MalformedData(format!(
                "Unknown integer width class {}",
                other
            ))),
        }
    }
}

/// The two leading bytes of every encoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub flags: u8,
}

impl Header {
    pub fn new(compressed: bool) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            flags: if compressed { FLAG_COMPRESSED } else { 0 },
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        [self.version, self.flags]
    }

    /// Parses and validates the header. The version is checked before anything else.
    pub fn parse(buffer: &[u8]) -> Result<Header> {
        let Some(&version) = buffer.first() else {
            return Err(CodecError::MalformedData(
                "Buffer is empty, expected a 2 byte header".into(),
            ));
        };
        if version != PROTOCOL_VERSION {
            return Err(CodecError::ProtocolVersion {
                found: version,
                expected: PROTOCOL_VERSION,
            });
        }
        let Some(&flags) = buffer.get(1) else {
            return Err(CodecError::MalformedData(
                "Buffer ends before the flags byte".into(),
            ));
        };
        if flags & !FLAG_COMPRESSED != 0 {
            return Err(CodecError::MalformedData(format!(
                "Unknown header flags {:#010b}",
                flags
            )));
        }
        Ok(Header { version, flags })
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Header(version {}, {})",
            self.version,
            if self.is_compressed() {
                "compressed"
            } else {
                "uncompressed"
            }
        )
    }
}
