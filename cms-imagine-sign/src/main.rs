// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

use anyhow::{self as ah, format_err as err, Context as _};
use clap::{Parser, Subcommand};
use cms_imagine::{
    compute_hash, decode_operations, decode_packed, sign, verify_hash, ImagineConfig,
    Operations, QueryParams, CONF_PATH,
};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
struct Opts {
    /// The imagine configuration file.
    #[arg(long, default_value = CONF_PATH)]
    config: PathBuf,

    /// Use this salt instead of the one from the configuration file.
    #[arg(long)]
    salt: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print the query string with the hash field added.
    Sign {
        /// The query string to sign.
        query: String,
    },

    /// Check the hash of a signed query string.
    Verify {
        /// The signed query string.
        query: String,
    },

    /// Print the image operations encoded in a query string.
    Decode {
        /// The query string, or a packed `name;key|value` operation with --packed.
        query: String,

        /// Decode a single packed operation instead of a query string.
        #[arg(long, default_value = "false")]
        packed: bool,
    },

    /// Print the hash of a query string.
    Hash {
        /// The query string.
        query: String,
    },
}

fn load_config(opts: &Opts) -> ah::Result<ImagineConfig> {
    match &opts.salt {
        Some(salt) => Ok(ImagineConfig::new(salt)),
        None => Ok(ImagineConfig::load(&opts.config).context("imagine.conf")?),
    }
}

fn parse_query(query: &str) -> ah::Result<QueryParams> {
    QueryParams::parse(query).ok_or_else(|| err!("Invalid query string: '{query}'"))
}

fn run(opts: &Opts) -> ah::Result<String> {
    Ok(match &opts.command {
        Command::Sign { query } => {
            let config = load_config(opts)?;
            sign(&parse_query(query)?, &config)?.to_query_string()
        }
        Command::Verify { query } => {
            let config = load_config(opts)?;
            verify_hash(&parse_query(query)?, &config)?;
            "Ok".to_string()
        }
        Command::Decode { query, packed } => {
            let ops = if *packed {
                let (name, op) = decode_packed(query)?;
                let mut ops = Operations::new();
                ops.insert(&name, op);
                ops
            } else {
                // Decoding needs no salt. Use the default hash field without a config file.
                let config = if opts.salt.is_none() && !opts.config.exists() {
                    ImagineConfig::default()
                } else {
                    load_config(opts)?
                };
                decode_operations(&parse_query(query)?.clone_without(config.hash_field()))?
            };
            ops.to_lines().trim_end().to_string()
        }
        Command::Hash { query } => {
            let config = load_config(opts)?;
            compute_hash(&parse_query(query)?, &config)?.unwrap_or_default()
        }
    })
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();
    let output = run(&opts)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(args: &[&str]) -> Opts {
        let mut argv = vec!["cms-imagine-sign", "--salt", "s3cr3t"];
        argv.extend_from_slice(args);
        Opts::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_sign_verify() {
        let signed = run(&opts(&["sign", "b=2&a=1"])).unwrap();
        assert!(signed.starts_with("a=1&b=2&hash="));
        assert_eq!(run(&opts(&["verify", signed.as_str()])).unwrap(), "Ok");
        assert!(run(&opts(&["verify", "a=1&b=2&hash=00"])).is_err());
        assert!(run(&opts(&["verify", "a=1&b=2"])).is_err());
    }

    #[test]
    fn test_hash() {
        let hash = run(&opts(&["hash", "a=1"])).unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(run(&opts(&["hash", "a=1&hash=ff"])).unwrap(), hash);
        assert_eq!(run(&opts(&["hash", ""])).unwrap(), "");
    }

    #[test]
    fn test_decode() {
        let out = run(&opts(&["decode", "--packed", "resize;width|100;height|200"])).unwrap();
        assert_eq!(out, "resize.height=200\nresize.width=100");
        let out = run(&opts(&["decode", "crop=x|1&hash=ab"])).unwrap();
        assert_eq!(out, "crop.x=1");
        assert!(run(&opts(&["decode", "crop=x"])).is_err());
    }

    #[test]
    fn test_decode_config() {
        let dir = std::env::temp_dir().join(format!("cms-imagine-sign-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // No configuration file: default hash field.
        let missing = dir.join("missing.conf");
        let o = Opts::try_parse_from([
            "cms-imagine-sign",
            "--config",
            missing.to_str().unwrap(),
            "decode",
            "crop=x|1&hash=ab",
        ])
        .unwrap();
        assert_eq!(run(&o).unwrap(), "crop.x=1");

        // Custom hash field from the configuration file.
        let good = dir.join("good.conf");
        std::fs::write(&good, "[CMS-IMAGINE]\nhash-field = sig\n").unwrap();
        let o = Opts::try_parse_from([
            "cms-imagine-sign",
            "--config",
            good.to_str().unwrap(),
            "decode",
            "crop=x|1&sig=ab",
        ])
        .unwrap();
        assert_eq!(run(&o).unwrap(), "crop.x=1");

        // A broken configuration file is an error.
        let bad = dir.join("bad.conf");
        std::fs::write(&bad, "[CMS-IMAGINE]\ncheck-hash = perhaps\n").unwrap();
        let o = Opts::try_parse_from([
            "cms-imagine-sign",
            "--config",
            bad.to_str().unwrap(),
            "decode",
            "crop=x|1",
        ])
        .unwrap();
        assert!(run(&o).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

// vim: ts=4 sw=4 expandtab
