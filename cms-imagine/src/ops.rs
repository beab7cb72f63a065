// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image operation parameter encoding.
//!
//! One query parameter holds one image operation.
//! The parameter name is the operation name and the value holds
//! the packed operation options:
//!
//! `thumbnail=width|100;height|200`

use crate::{
    error::{ImagineError, ImagineResult},
    numparse::{parse_bool, parse_f64, parse_u32},
    params::QueryParams,
};
use std::collections::{btree_map, BTreeMap};

const SEGSEP: char = ';';
const KVSEP: char = '|';

/// The options of one image operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Operation(BTreeMap<String, String>);

impl Operation {
    pub fn new() -> Self {
        Default::default()
    }

    /// Decode the packed options string `key|value;key|value`.
    ///
    /// [name] is only used for error reporting.
    fn unpack(name: &str, packed: &str) -> ImagineResult<Self> {
        let mut op = Self::new();
        for segment in packed.split(SEGSEP) {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once(KVSEP) {
                Some((key, value)) if !key.is_empty() => {
                    op.0.insert(key.to_string(), value.to_string());
                }
                _ => {
                    return Err(ImagineError::MalformedSegment {
                        param: name.to_string(),
                        segment: segment.to_string(),
                    });
                }
            }
        }
        Ok(op)
    }

    /// Encode the options into the packed string `key|value;key|value`.
    ///
    /// [name] is only used for error reporting.
    pub fn pack(&self, name: &str) -> ImagineResult<String> {
        let mut packed = String::with_capacity(64);
        for (key, value) in &self.0 {
            if key.is_empty() || key.contains([SEGSEP, KVSEP]) || value.contains(SEGSEP) {
                return Err(ImagineError::Unpackable {
                    name: name.to_string(),
                    key: key.to_string(),
                });
            }
            if !packed.is_empty() {
                packed.push(SEGSEP);
            }
            packed.push_str(key);
            packed.push(KVSEP);
            packed.push_str(value);
        }
        Ok(packed)
    }

    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_str(key).and_then(parse_u32)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get_str(key).and_then(parse_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_str(key).and_then(parse_bool)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Operation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn escape_line(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_control() || c == '\\' {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Image operations by operation name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Operations(BTreeMap<String, Operation>);

impl Operations {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: &str, op: Operation) -> Option<Operation> {
        self.0.insert(name.to_string(), op)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Operation> {
        self.0.iter()
    }

    /// Format all options as `name.key=value` lines.
    ///
    /// Control characters and backslashes are escaped,
    /// so that every option is exactly one line.
    pub fn to_lines(&self) -> String {
        let mut s = String::with_capacity(256);
        for (name, op) in self.iter() {
            for (key, value) in op.iter() {
                s.push_str(&format!(
                    "{}.{}={}\n",
                    escape_line(name),
                    escape_line(key),
                    escape_line(value)
                ));
            }
        }
        s
    }
}

impl<'a> IntoIterator for &'a Operations {
    type Item = (&'a String, &'a Operation);
    type IntoIter = btree_map::Iter<'a, String, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Decode all [named_params] into image operations.
pub fn decode_operations(named_params: &QueryParams) -> ImagineResult<Operations> {
    let mut ops = Operations::new();
    for (name, packed) in named_params.iter() {
        ops.insert(name, Operation::unpack(name, packed)?);
    }
    Ok(ops)
}

/// Decode the self-describing packed form `name;key|value;key|value`.
///
/// The first segment is the operation name.
pub fn decode_packed(packed: &str) -> ImagineResult<(String, Operation)> {
    let (name, options) = packed.split_once(SEGSEP).unwrap_or((packed, ""));
    if name.is_empty() {
        return Err(ImagineError::EmptyPacked);
    }
    if name.contains(KVSEP) {
        return Err(ImagineError::MalformedSegment {
            param: String::new(),
            segment: name.to_string(),
        });
    }
    Ok((name.to_string(), Operation::unpack(name, options)?))
}

/// Encode all [ops] into query parameters.
pub fn pack_operations(ops: &Operations) -> ImagineResult<QueryParams> {
    let mut params = QueryParams::new();
    for (name, op) in ops {
        params.insert(name, &op.pack(name)?);
    }
    Ok(params)
}


// vim: ts=4 sw=4 expandtab
