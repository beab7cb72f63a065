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

mod cgi;

use crate::cgi::Cgi;
use anyhow::{self as ah, Context as _};
use clap::Parser;
use cms_imagine::{ImagineConfig, CONF_PATH};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
struct Opts {
    /// The imagine configuration file.
    #[arg(long, default_value = CONF_PATH)]
    config: PathBuf,
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();
    let config = ImagineConfig::load(&opts.config).context("imagine.conf");
    let cgi = Cgi::new(config)?;
    cgi.run()
}

// vim: ts=4 sw=4 expandtab
