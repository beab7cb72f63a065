// -*- coding: utf-8 -*-
//
// Simple CMS
//
// Copyright (C) 2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

/// HTTP status class of an [ImagineError].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HttpStatus {
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
}

impl From<HttpStatus> for u32 {
    fn from(status: HttpStatus) -> Self {
        status as Self
    }
}

impl HttpStatus {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} {}", *self as u16, self.reason())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ImagineError {
    #[error("Imagine salt is not configured. Set 'salt' in the [CMS-IMAGINE] section.")]
    MissingSalt,

    #[error("Hash field '{0}' is missing from the query.")]
    MissingHash(String),

    #[error("Query hash mismatch.")]
    HashMismatch,

    #[error("Invalid query string.")]
    InvalidQuery,

    #[error("Parameter '{param}': Malformed operation segment '{segment}'.")]
    MalformedSegment { param: String, segment: String },

    #[error("Packed operation string is empty.")]
    EmptyPacked,

    #[error("Operation '{name}': Option '{key}' can not be packed.")]
    Unpackable { name: String, key: String },

    #[error("Failed to serialize query parameters: {0}")]
    Serialize(#[from] bincode::Error),

    #[error("Configuration: {0}")]
    Config(String),
}

impl ImagineError {
    /// The request was rejected because of a missing or wrong hash.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingHash(_) | Self::HashMismatch)
    }

    /// Map the error to the HTTP status that shall be sent to the client.
    ///
    /// Unauthorized requests are answered with "Not Found"
    /// to avoid revealing the existence of the endpoint.
    pub fn http_status(&self) -> HttpStatus {
        match self {
            Self::MissingHash(_) | Self::HashMismatch => HttpStatus::NotFound,
            Self::InvalidQuery | Self::MalformedSegment { .. } | Self::EmptyPacked => {
                HttpStatus::BadRequest
            }
            Self::MissingSalt | Self::Unpackable { .. } | Self::Serialize(_) | Self::Config(_) => {
                HttpStatus::InternalServerError
            }
        }
    }
}

pub type ImagineResult<T> = Result<T, ImagineError>;


// vim: ts=4 sw=4 expandtab
