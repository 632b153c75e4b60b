// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
bpcodec - brandpress value codec tool

Converts JSON documents to encoded blobs and back, and describes blobs.
Relative blob paths (`.bin` arguments) are resolved against `storage.blob_dir`;
JSON paths are taken as given.

Usage:
  bpcodec encode <input.json> <output.bin> [--compress]
  bpcodec decode <input.bin> [output.json]
  bpcodec inspect <input.bin>

Options:
  --compress             Compress the payload (overrides codec.compress)
  --config=<path>        Use this config file instead of searching for brandpress.toml
  --set <key>=<value>    Override a config value, e.g. --set compression_level=6
  --debug-<crate>        Debug logging for one crate, --debug-all for every crate

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use anyhow::{bail, Context, Result};
use brandpress::codec::{load_value, save_value, CodecOptions};
use brandpress::config::{load_config_or_default, StorageSettings};
use brandpress::inspect::BufferSummary;
use brandpress::json::{parse_json, render_json};
use brandpress::observability::{debug_flags_help, init_logging, parse_debug_flags};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Invocation {
    positional: Vec<String>,
    compress: bool,
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
    help: bool,
}

fn parse_invocation(args: &[String]) -> Result<Invocation> {
    let mut invocation = Invocation::default();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "--compress" {
            invocation.compress = true;
        } else if arg == "--help" || arg == "-h" {
            invocation.help = true;
        } else if let Some(path) = arg.strip_prefix("--config=") {
            invocation.config_path = Some(PathBuf::from(path));
        } else if arg == "--set" {
            let pair = args.next().context("--set needs a key=value argument")?;
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("--set expects key=value, got '{}'", pair))?;
            invocation
                .overrides
                .insert(key.trim().to_string(), value.trim().to_string());
        } else if arg.starts_with("--debug-") {
            // consumed by parse_debug_flags
        } else if arg.starts_with("--") {
            bail!("Unknown option '{}'", arg);
        } else {
            invocation.positional.push(arg.clone());
        }
    }
    Ok(invocation)
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Encode { input: PathBuf, output: PathBuf },
    Decode { input: PathBuf, output: Option<PathBuf> },
    Inspect { input: PathBuf },
}

impl Command {
    fn from_positional(positional: &[String]) -> Option<Self> {
        let positional: Vec<&str> = positional.iter().map(String::as_str).collect();
        let command = match positional.as_slice() {
            ["encode", input, output] => Command::Encode {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
            },
            ["decode", input] => Command::Decode {
                input: PathBuf::from(input),
                output: None,
            },
            ["decode", input, output] => Command::Decode {
                input: PathBuf::from(input),
                output: Some(PathBuf::from(output)),
            },
            ["inspect", input] => Command::Inspect {
                input: PathBuf::from(input),
            },
            _ => return None,
        };
        Some(command)
    }

    /// Moves the blob side of the command under the configured blob directory.
    fn resolve_blobs(self, storage: &StorageSettings) -> Self {
        match self {
            Command::Encode { input, output } => Command::Encode {
                input,
                output: storage.blob_path(output),
            },
            Command::Decode { input, output } => Command::Decode {
                input: storage.blob_path(input),
                output,
            },
            Command::Inspect { input } => Command::Inspect {
                input: storage.blob_path(input),
            },
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {0} encode <input.json> <output.bin> [--compress]\n  {0} decode <input.bin> [output.json]\n  {0} inspect <input.bin>\n\nOptions:\n  --compress\n  --config=<path>\n  --set <key>=<value>\n\n{1}",
        program,
        debug_flags_help()
    )
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("bpcodec");
    let invocation = parse_invocation(&args[1.min(args.len())..])?;

    if invocation.help || invocation.positional.is_empty() {
        eprintln!("{}", usage(program));
        std::process::exit(if invocation.help { 0 } else { 2 });
    }

    let config = load_config_or_default(
        invocation.config_path.as_deref(),
        Some(&invocation.overrides),
    )
    .context("Failed to load brandpress configuration")?;
    init_logging(&config.logging, &parse_debug_flags())?;

    let mut options = config.codec.to_codec_options();
    if invocation.compress {
        options = options.with_compression(true);
    }

    let command = match Command::from_positional(&invocation.positional) {
        Some(command) => command.resolve_blobs(&config.storage),
        None => {
            eprintln!("{}", usage(program));
            std::process::exit(2);
        }
    };

    match command {
        Command::Encode { input, output } => encode_file(&input, &output, &options),
        Command::Decode { input, output } => decode_file(&input, output.as_deref(), &options),
        Command::Inspect { input } => inspect_file(&input, &options),
    }
}

fn encode_file(input: &Path, output: &Path, options: &CodecOptions) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value = parse_json(&text)?;
    if value.contains_other() {
        warn!("input holds numbers beyond the signed 64-bit range; they are stored as text");
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let written = save_value(output, &value, options)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        json_bytes = text.len(),
        encoded_bytes = written,
        compressed = options.compress,
        "encoded"
    );
    Ok(())
}

fn decode_file(input: &Path, output: Option<&Path>, options: &CodecOptions) -> Result<()> {
    let value = load_value(input, options)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    let rendered = render_json(&value, true)?;

    match output {
        Some(path) => {
            fs::write(path, rendered.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(input = %input.display(), output = %path.display(), "decoded");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn inspect_file(input: &Path, options: &CodecOptions) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let summary = BufferSummary::from_buffer(&bytes, options)
        .with_context(|| format!("{} is not a valid encoded value", input.display()))?;
    println!("{}", summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options_and_positionals_split() {
        let invocation = parse_invocation(&args(&[
            "encode",
            "post.json",
            "--compress",
            "--config=/etc/brandpress.toml",
            "--set",
            " compression_level = 6 ",
            "--debug-brandpress-codec",
            "post.bin",
        ]))
        .unwrap();

        assert_eq!(invocation.positional, args(&["encode", "post.json", "post.bin"]));
        assert!(invocation.compress);
        assert!(!invocation.help);
        assert_eq!(
            invocation.config_path,
            Some(PathBuf::from("/etc/brandpress.toml"))
        );
        assert_eq!(
            invocation.overrides.get("compression_level").map(String::as_str),
            Some("6")
        );
    }

    #[test]
    fn test_set_keeps_equals_in_value() {
        let invocation = parse_invocation(&args(&["--set", "blob_dir=/data/a=b"])).unwrap();
        assert_eq!(
            invocation.overrides.get("blob_dir").map(String::as_str),
            Some("/data/a=b")
        );
    }

    #[test]
    fn test_bad_options_rejected() {
        assert!(parse_invocation(&args(&["--set"])).is_err());
        assert!(parse_invocation(&args(&["--set", "compress"])).is_err());
        assert!(parse_invocation(&args(&["--verbose"])).is_err());
        assert!(parse_invocation(&args(&["-h"])).unwrap().help);
    }

    #[test]
    fn test_command_dispatch() {
        assert_eq!(
            Command::from_positional(&args(&["encode", "a.json", "a.bin"])),
            Some(Command::Encode {
                input: PathBuf::from("a.json"),
                output: PathBuf::from("a.bin"),
            })
        );
        assert_eq!(
            Command::from_positional(&args(&["decode", "a.bin"])),
            Some(Command::Decode {
                input: PathBuf::from("a.bin"),
                output: None,
            })
        );
        assert_eq!(
            Command::from_positional(&args(&["decode", "a.bin", "a.json"])),
            Some(Command::Decode {
                input: PathBuf::from("a.bin"),
                output: Some(PathBuf::from("a.json")),
            })
        );
        assert_eq!(
            Command::from_positional(&args(&["inspect", "a.bin"])),
            Some(Command::Inspect {
                input: PathBuf::from("a.bin"),
            })
        );
        assert_eq!(Command::from_positional(&args(&["encode", "a.json"])), None);
        assert_eq!(Command::from_positional(&args(&["publish", "a.bin"])), None);
    }

    #[test]
    fn test_blob_paths_resolve_against_blob_dir() {
        let storage = StorageSettings {
            blob_dir: PathBuf::from("/srv/blobs"),
        };

        let encode = Command::from_positional(&args(&["encode", "post.json", "north/post.bin"]))
            .unwrap()
            .resolve_blobs(&storage);
        assert_eq!(
            encode,
            Command::Encode {
                input: PathBuf::from("post.json"),
                output: PathBuf::from("/srv/blobs/north/post.bin"),
            }
        );

        let decode = Command::from_positional(&args(&["decode", "post.bin", "out.json"]))
            .unwrap()
            .resolve_blobs(&storage);
        assert_eq!(
            decode,
            Command::Decode {
                input: PathBuf::from("/srv/blobs/post.bin"),
                output: Some(PathBuf::from("out.json")),
            }
        );
    }

    #[test]
    fn test_encode_and_decode_files_through_blob_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageSettings {
            blob_dir: dir.path().join("blobs"),
        };
        let json_path = dir.path().join("post.json");
        fs::write(&json_path, r#"{"brand": "north", "views": 12}"#).unwrap();
        let json_out = dir.path().join("out.json");
        let options = CodecOptions::default().with_compression(true);

        let encode = Command::Encode {
            input: json_path,
            output: PathBuf::from("north/post.bin"),
        }
        .resolve_blobs(&storage);
        if let Command::Encode { input, output } = &encode {
            encode_file(input, output, &options).unwrap();
        }
        assert!(dir.path().join("blobs/north/post.bin").is_file());

        let decode = Command::Decode {
            input: PathBuf::from("north/post.bin"),
            output: Some(json_out.clone()),
        }
        .resolve_blobs(&storage);
        if let Command::Decode { input, output } = &decode {
            decode_file(input, output.as_deref(), &options).unwrap();
        }
        let rendered: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
        assert_eq!(rendered["brand"], "north");
        assert_eq!(rendered["views"], 12);
    }
}
