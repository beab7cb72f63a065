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
    config::ImagineConfig,
    error::ImagineResult,
    hash::{sign, verify_hash},
    ops::{decode_operations, pack_operations, Operations},
    params::QueryParams,
};

/// Request guard for image processing actions.
pub struct ImagineGuard {
    config: ImagineConfig,
}

impl ImagineGuard {
    pub fn new(config: ImagineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImagineConfig {
        &self.config
    }

    /// Run the guard for a request to [action].
    ///
    /// Returns `Ok(None)`, if the action is not guarded.
    /// Otherwise the hash is checked (if enabled) and the
    /// image operations are decoded from the [params].
    pub fn startup(&self, action: &str, params: &QueryParams) -> ImagineResult<Option<Operations>> {
        if !self.config.is_guarded_action(action) {
            return Ok(None);
        }
        if self.config.check_hash() {
            verify_hash(params, &self.config)?;
        }
        Ok(Some(self.unpack_params(params)?))
    }

    /// Decode all [params] except the hash field into image operations.
    pub fn unpack_params(&self, params: &QueryParams) -> ImagineResult<Operations> {
        decode_operations(&params.clone_without(self.config.hash_field()))
    }

    /// Pack and sign [ops] into a percent-encoded query string.
    pub fn url_query(&self, ops: &Operations) -> ImagineResult<String> {
        let params = pack_operations(ops)?;
        Ok(sign(&params, &self.config)?.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ImagineError, ops::Operation};

    fn guard() -> ImagineGuard {
        ImagineGuard::new(ImagineConfig::new("salt").with_actions(&["thumbnail", "display"]))
    }

    fn thumb_ops() -> Operations {
        let mut ops = Operations::new();
        ops.insert(
            "thumbnail",
            [("width", "100"), ("height", "200")].into_iter().collect::<Operation>(),
        );
        ops
    }

    #[test]
    fn test_unguarded_action() {
        let p = QueryParams::parse("thumbnail=garbage").unwrap();
        assert_eq!(guard().startup("index", &p).unwrap(), None);

        // Empty action list guards nothing.
        let g = ImagineGuard::new(ImagineConfig::new("salt"));
        assert_eq!(g.startup("thumbnail", &p).unwrap(), None);
    }

    #[test]
    fn test_startup() {
        let g = guard();
        let p = sign(&pack_operations(&thumb_ops()).unwrap(), g.config()).unwrap();
        assert!(p.contains("hash"));
        let ops = g.startup("thumbnail", &p).unwrap().unwrap();
        assert_eq!(ops, thumb_ops());
        assert!(ops.get("hash").is_none());
    }

    #[test]
    fn test_url_query() {
        let g = guard();
        let query = g.url_query(&thumb_ops()).unwrap();
        let hash = crate::hash::compute_hash(&pack_operations(&thumb_ops()).unwrap(), g.config())
            .unwrap()
            .unwrap();
        assert_eq!(
            query,
            format!("hash={hash}&thumbnail=height%7C200%3Bwidth%7C100")
        );
        assert_eq!(g.url_query(&Operations::new()).unwrap(), "");
    }

    #[test]
    fn test_url_query_startup() {
        let g = guard();
        let mut ops = thumb_ops();
        ops.insert(
            "text",
            [("content", "a b+c%|x"), ("color", "red")]
                .into_iter()
                .collect::<Operation>(),
        );
        let query = g.url_query(&ops).unwrap();
        let p = QueryParams::parse(&query).unwrap();
        assert_eq!(p.len(), 3);
        let decoded = g.startup("thumbnail", &p).unwrap().unwrap();
        assert_eq!(decoded, ops);
        assert_eq!(
            decoded.get("text").unwrap().get_str("content"),
            Some("a b+c%|x")
        );
    }

    #[test]
    fn test_startup_unauthorized() {
        let g = guard();
        let mut p = sign(&pack_operations(&thumb_ops()).unwrap(), g.config()).unwrap();
        p.insert("thumbnail", "width|5000;height|5000");
        let e = g.startup("display", &p).unwrap_err();
        assert!(e.is_unauthorized());

        p.remove("hash");
        let e = g.startup("display", &p).unwrap_err();
        assert!(matches!(e, ImagineError::MissingHash(_)));
    }

    #[test]
    fn test_startup_no_check() {
        let g = ImagineGuard::new(
            ImagineConfig::default()
                .with_check_hash(false)
                .with_actions(&["thumbnail"]),
        );
        let p: QueryParams = [("thumbnail", "width|100")].into_iter().collect();
        let ops = g.startup("thumbnail", &p).unwrap().unwrap();
        assert_eq!(ops.get("thumbnail").unwrap().get_u32("width"), Some(100));

        let p: QueryParams = [("thumbnail", "width")].into_iter().collect();
        assert!(matches!(
            g.startup("thumbnail", &p),
            Err(ImagineError::MalformedSegment { .. })
        ));
    }

    #[test]
    fn test_startup_missing_salt() {
        let g = ImagineGuard::new(ImagineConfig::default().with_actions(&["thumbnail"]));
        let p: QueryParams = [("thumbnail", "width|100"), ("hash", "00")].into_iter().collect();
        assert!(matches!(
            g.startup("thumbnail", &p),
            Err(ImagineError::MissingSalt)
        ));
    }
}

// vim: ts=4 sw=4 expandtab
