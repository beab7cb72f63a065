// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, format_err as err};
use cms_imagine::{HttpStatus, ImagineConfig, ImagineError, ImagineGuard, Operations, QueryParams};
use std::{
    env,
    ffi::OsString,
    io::{self, Write as _},
};

const MAX_CGIENV_LEN: usize = 1024 * 4;

fn get_cgienv(name: &str) -> ah::Result<OsString> {
    let value = env::var_os(name).unwrap_or_default();
    if value.len() <= MAX_CGIENV_LEN {
        Ok(value)
    } else {
        Err(err!("Environment variable '{name}' is too long."))
    }
}

fn get_cgienv_str(name: &str) -> ah::Result<String> {
    if let Ok(s) = get_cgienv(name)?.into_string() {
        Ok(s)
    } else {
        Err(err!("Environment variable '{name}' is not valid UTF-8."))
    }
}

/// A complete CGI response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    status: u32,
    reason: &'static str,
    body: Vec<u8>,
}

impl Response {
    fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            reason: "Ok",
            body,
        }
    }

    fn error(status: HttpStatus) -> Self {
        Self {
            status: status.into(),
            reason: status.reason(),
            body: format!("{status}\n").into_bytes(),
        }
    }

    /// Write the response to stdout.
    pub fn send(&self, head_only: bool) -> ah::Result<()> {
        let mut f = io::stdout().lock();
        f.write_all(b"Content-type: text/plain; charset=UTF-8\n")?;
        f.write_all(format!("Status: {} {}\n", self.status, self.reason).as_bytes())?;
        f.write_all(b"\n")?;
        if !head_only {
            f.write_all(&self.body)?;
        }
        f.flush()?;
        Ok(())
    }
}

impl From<Result<Option<Operations>, ImagineError>> for Response {
    fn from(result: Result<Option<Operations>, ImagineError>) -> Self {
        match result {
            Ok(Some(ops)) => Self::ok(ops.to_lines().into_bytes()),
            // Not a guarded action. Nothing to process here.
            Ok(None) => Self::error(HttpStatus::NotFound),
            Err(e) => {
                if e.is_unauthorized() {
                    eprintln!("cms-imagine: Rejected request: {e}");
                } else {
                    eprintln!("cms-imagine: {e}");
                }
                Self::error(e.http_status())
            }
        }
    }
}

/// Get the action name from the PATH_INFO.
///
/// The action is the last non-empty path element.
fn action_from_path(path: &str) -> Option<&str> {
    path.split('/').rev().find(|e| !e.is_empty())
}

pub struct Cgi {
    query: String,
    meth: String,
    path: String,
    guard: Option<ImagineGuard>,
}

impl Cgi {
    pub fn new(config: ah::Result<ImagineConfig>) -> ah::Result<Self> {
        let guard = match config {
            Ok(config) => Some(ImagineGuard::new(config)),
            Err(e) => {
                eprintln!("cms-imagine: {e:#}");
                None
            }
        };

        let query = get_cgienv_str("QUERY_STRING").unwrap_or_default();
        let meth = get_cgienv_str("REQUEST_METHOD")?.trim().to_string();
        let path = get_cgienv_str("PATH_INFO").unwrap_or_default();

        Ok(Self {
            query,
            meth,
            path,
            guard,
        })
    }

    fn handle(&self) -> Response {
        let Some(guard) = &self.guard else {
            return Response::error(HttpStatus::InternalServerError);
        };
        match &self.meth[..] {
            "GET" | "HEAD" => (),
            meth => {
                eprintln!("cms-imagine: Unsupported REQUEST_METHOD: '{meth}'");
                return Response::error(HttpStatus::BadRequest);
            }
        }
        let Some(action) = action_from_path(&self.path) else {
            return Response::error(HttpStatus::NotFound);
        };
        let Some(params) = QueryParams::parse(&self.query) else {
            return Response::error(HttpStatus::BadRequest);
        };
        guard.startup(action, &params).into()
    }

    pub fn run(&self) -> ah::Result<()> {
        self.handle().send(self.meth == "HEAD")
    }
}


// vim: ts=4 sw=4 expandtab
