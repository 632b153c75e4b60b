//! # brandpress
//!
//! Binary value codec for a multi-brand content platform, with the
//! configuration and logging layers the platform's tools share.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! brandpress = "0.1"  # Default: codec + config + observability
//! ```
//!
//! ```rust
//! use brandpress::prelude::*;
//!
//! let post = Value::map([
//!     ("brand", Value::from("lighthouse")),
//!     ("title", Value::from("Spring lineup")),
//!     ("published", Value::from(true)),
//! ]);
//!
//! let blob = encode(&post, true)?;
//! assert_eq!(decode(&blob)?, post);
//! # Ok::<(), CodecError>(())
//! ```
//!
//! ## Feature Flags
//! - **`config`** (default): `brandpress.toml` loading with env/CLI overrides
//! - **`observability`** (default): tracing subscriber setup, per-crate debug flags
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  brandpress-codec                            │
//! │  (Value, wire format, zlib, file helpers)    │
//! └──────────────────────────────────────────────┘
//!                        ↓
//! ┌──────────────────────────────────────────────┐
//! │  brandpress-config                           │
//! │  (TOML + env + CLI → CodecOptions)           │
//! └──────────────────────────────────────────────┘
//!                        ↓
//! ┌──────────────────────────────────────────────┐
//! │  brandpress-observability                    │
//! │  (tracing-subscriber, debug flags)           │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use brandpress_codec as codec;

#[cfg(feature = "config")]
pub use brandpress_config as config;

#[cfg(feature = "observability")]
pub use brandpress_observability as observability;

pub mod inspect;
pub mod json;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::codec::{
        decode, decode_with, encode, encode_with, load_value, save_value, CodecError,
        CodecOptions, Value,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config_or_default, BrandpressConfig};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let bytes = encode(&Value::Null, false).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Value::Null);
    }
}
