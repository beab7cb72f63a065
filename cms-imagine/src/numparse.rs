// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number and boolean parsing for operation option values and config entries.

pub fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(s) = s.strip_prefix("0x") {
        u32::from_str_radix(s, 16).ok()
    } else {
        s.parse::<u32>().ok()
    }
}

pub fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.to_lowercase();
    match s.trim() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_num() {
        assert_eq!(parse_u32(" 100 "), Some(100));
        assert_eq!(parse_u32("0x10"), Some(16));
        assert_eq!(parse_u32("-1"), None);
        assert_eq!(parse_u32("abc"), None);
        assert_eq!(parse_f64("0.5"), Some(0.5));
        assert_eq!(parse_f64("inf"), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("On"), Some(true));
        assert_eq!(parse_bool(" no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}

// vim: ts=4 sw=4 expandtab
