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

mod config;
mod error;
mod guard;
mod hash;
mod numparse;
mod ops;
mod params;

pub use crate::{
    config::{ImagineConfig, CONF_PATH, DEFAULT_HASH_FIELD},
    error::{HttpStatus, ImagineError, ImagineResult},
    guard::ImagineGuard,
    hash::{check_hash, compute_hash, sign, verify_hash},
    ops::{decode_operations, decode_packed, pack_operations, Operation, Operations},
    params::QueryParams,
};

// vim: ts=4 sw=4 expandtab
