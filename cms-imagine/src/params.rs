// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use querystrong::QueryStrong;
use std::{collections::BTreeMap, str::FromStr};

const MAX_QUERY_LEN: usize = 1024 * 4;

/// Untrusted request query parameters.
///
/// The parameters are kept sorted by name.
/// Only plain `name=value` pairs are held.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parse a raw (percent-encoded) query string.
    ///
    /// Returns None, if the query string is too long or can't be parsed.
    /// Repeated names (`a=1&a=2`) and nested names (`a[b]=1`) are rejected,
    /// because their values can't be represented unambiguously.
    pub fn parse(query: &str) -> Option<Self> {
        if query.len() > MAX_QUERY_LEN {
            return None;
        }
        let query = query.trim().trim_start_matches('?');
        if query.is_empty() {
            return Some(Self::new());
        }
        let q = QueryStrong::parse(query).ok()?;
        let mut items = BTreeMap::new();
        for (n, v) in q.as_map()? {
            let querystrong::Value::String(v) = v else {
                return None;
            };
            items.insert(n.to_string(), v.to_string());
        }
        Some(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, value: &str) -> Option<String> {
        self.0.insert(name.to_string(), value.to_string())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Clone self and remove the [name] parameter.
    pub fn clone_without(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.remove(name);
        new
    }

    /// Iterate over all parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Get a reference to the sorted parameter map.
    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Build a percent-encoded query string (without leading '?').
    pub fn to_query_string(&self) -> String {
        let mut query = String::with_capacity(256);
        for (n, v) in self.iter() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&url_escape::encode_component(n));
            query.push('=');
            query.push_str(&url_escape::encode_component(v));
        }
        query
    }
}

impl FromStr for QueryParams {
    type Err = crate::ImagineError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        Self::parse(query).ok_or(crate::ImagineError::InvalidQuery)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}


// vim: ts=4 sw=4 expandtab
