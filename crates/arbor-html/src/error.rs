/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for parsing and graph construction.

use thiserror::Error;

/// Errors that can occur while turning input into a [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not valid UTF-8. Detected before the parser runs.
    #[error("Input is not valid UTF-8: {source}")]
    Encoding {
        #[source]
        source: std::str::Utf8Error,
    },

    /// The parser produced no usable output.
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// The parser returned a code outside a known vocabulary.
    #[error("Invalid {vocabulary} code: {code}")]
    InvalidEnum { vocabulary: &'static str, code: u32 },

    /// A lookup was given an argument of the wrong kind.
    #[error("Invalid argument: {message}")]
    Argument { message: String },
}

impl Error {
    pub(crate) fn invalid_enum(vocabulary: &'static str, code: u32) -> Self {
        Error::InvalidEnum { vocabulary, code }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(source: std::str::Utf8Error) -> Self {
        Error::Encoding { source }
    }
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
