// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Salted query hash.
//!
//! The hash protects the image query parameters against tampering,
//! so that clients can't request arbitrary image operations
//! (e.g. by incrementing the width and height in the URL).

use crate::{
    config::ImagineConfig,
    error::{ImagineError, ImagineResult},
    params::QueryParams,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn new_mac(salt: &str, params: &QueryParams) -> ImagineResult<HmacSha256> {
    // The bincode encoding of the sorted map is deterministic.
    let mut message = bincode::serialize(params.as_map())?;
    message.extend_from_slice(salt.as_bytes());

    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|e| ImagineError::Config(format!("Invalid salt: {e}")))?;
    mac.update(&message);
    Ok(mac)
}

/// Calculate the hash of the query [params] without the hash field.
///
/// Returns `Ok(None)`, if there are no parameters at all.
pub fn compute_hash(params: &QueryParams, config: &ImagineConfig) -> ImagineResult<Option<String>> {
    let salt = config.salt()?;
    if params.is_empty() {
        return Ok(None);
    }
    let params = params.clone_without(config.hash_field());
    let mac = new_mac(salt, &params)?;
    Ok(Some(hex::encode(mac.finalize().into_bytes())))
}

/// Compare the hash in the query [params] with the hash calculated
/// from the other parameters and the salt.
///
/// A missing or wrong hash is an unauthorized request.
pub fn verify_hash(params: &QueryParams, config: &ImagineConfig) -> ImagineResult<()> {
    let salt = config.salt()?;
    let hash_field = config.hash_field();
    let provided = match params.get(hash_field) {
        Some(h) if !h.trim().is_empty() => h.trim(),
        _ => return Err(ImagineError::MissingHash(hash_field.to_string())),
    };
    let Ok(provided) = hex::decode(provided) else {
        return Err(ImagineError::HashMismatch);
    };
    let params = params.clone_without(hash_field);
    new_mac(salt, &params)?
        .verify_slice(&provided)
        .map_err(|_| ImagineError::HashMismatch)
}

/// Same as [verify_hash], but reports an unauthorized request as `Ok(false)`.
pub fn check_hash(params: &QueryParams, config: &ImagineConfig) -> ImagineResult<bool> {
    match verify_hash(params, config) {
        Ok(()) => Ok(true),
        Err(e) if e.is_unauthorized() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Clone the [params] and add the hash field.
pub fn sign(params: &QueryParams, config: &ImagineConfig) -> ImagineResult<QueryParams> {
    let hash = compute_hash(params, config)?;
    let mut signed = params.clone_without(config.hash_field());
    if let Some(hash) = hash {
        signed.insert(config.hash_field(), &hash);
    }
    Ok(signed)
}


// vim: ts=4 sw=4 expandtab
