// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    error::{ImagineError, ImagineResult},
    numparse::parse_bool,
};
use configparser::ini::Ini;
use std::path::Path;

pub const CONF_PATH: &str = "/opt/cms/etc/cms/imagine.conf";
const SECT: &str = "CMS-IMAGINE";

pub const DEFAULT_HASH_FIELD: &str = "hash";

/// Image query guard configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagineConfig {
    salt: String,
    hash_field: String,
    check_hash: bool,
    actions: Vec<String>,
}

impl Default for ImagineConfig {
    fn default() -> Self {
        Self {
            salt: String::new(),
            hash_field: DEFAULT_HASH_FIELD.to_string(),
            check_hash: true,
            actions: vec![],
        }
    }
}

impl ImagineConfig {
    pub fn new(salt: &str) -> Self {
        Self {
            salt: salt.to_string(),
            ..Default::default()
        }
    }

    pub fn with_hash_field(mut self, hash_field: &str) -> Self {
        self.hash_field = hash_field.to_string();
        self
    }

    pub fn with_check_hash(mut self, check_hash: bool) -> Self {
        self.check_hash = check_hash;
        self
    }

    pub fn with_actions<S: AsRef<str>>(mut self, actions: &[S]) -> Self {
        self.actions = actions.iter().map(|a| a.as_ref().to_string()).collect();
        self
    }

    /// Load the configuration from an ini file.
    pub fn load(path: &Path) -> ImagineResult<Self> {
        let mut ini = Ini::new_cs();
        if let Err(e) = ini.load(path) {
            return Err(ImagineError::Config(format!(
                "Failed to load configuration {}: {e}",
                path.display()
            )));
        }
        Self::from_ini(&ini)
    }

    /// Parse the configuration from an ini formatted string.
    pub fn parse(conf: &str) -> ImagineResult<Self> {
        let mut ini = Ini::new_cs();
        if let Err(e) = ini.read(conf.to_string()) {
            return Err(ImagineError::Config(format!(
                "Failed to parse configuration: {e}"
            )));
        }
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ImagineResult<Self> {
        let mut conf = Self::default();
        if let Some(salt) = ini.get(SECT, "salt") {
            conf.salt = salt.trim().to_string();
        }
        if let Some(hash_field) = ini.get(SECT, "hash-field") {
            let hash_field = hash_field.trim();
            if hash_field.is_empty() {
                return Err(ImagineError::Config("'hash-field' is empty.".to_string()));
            }
            conf.hash_field = hash_field.to_string();
        }
        if let Some(check_hash) = ini.get(SECT, "check-hash") {
            let Some(check_hash) = parse_bool(&check_hash) else {
                return Err(ImagineError::Config(format!(
                    "'check-hash' is not a boolean: '{check_hash}'"
                )));
            };
            conf.check_hash = check_hash;
        }
        if let Some(actions) = ini.get(SECT, "actions") {
            conf.actions = actions
                .split(',')
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(|a| a.to_string())
                .collect();
        }
        Ok(conf)
    }

    /// Get the salt.
    ///
    /// Returns an error, if no salt has been configured.
    pub fn salt(&self) -> ImagineResult<&str> {
        if self.salt.is_empty() {
            Err(ImagineError::MissingSalt)
        } else {
            Ok(&self.salt)
        }
    }

    pub fn hash_field(&self) -> &str {
        &self.hash_field
    }

    pub fn check_hash(&self) -> bool {
        self.check_hash
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Check whether requests to [action] are guarded.
    pub fn is_guarded_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}


// vim: ts=4 sw=4 expandtab
