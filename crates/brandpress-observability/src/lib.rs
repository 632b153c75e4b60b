// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # brandpress-observability
//!
//! Logging setup shared by brandpress binaries, with per-crate debug flag support.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known brandpress crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "brandpress",
    "brandpress-codec",
    "brandpress-config",
    "brandpress-observability",
];
