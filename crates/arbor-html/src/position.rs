/*
 * position.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source positions.

use std::fmt;

use arbor_native::RawSourcePosition;
use serde::{Deserialize, Serialize};

/// A location in the parsed input.
///
/// `line` and `column` are 1-based; `offset` is a 0-based byte offset.
/// Columns count characters, with tabs advancing to the next tab stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Byte offset as a `usize`, for slicing the input.
    pub fn byte_offset(&self) -> usize {
        self.offset as usize
    }
}

impl From<&RawSourcePosition> for SourcePosition {
    fn from(raw: &RawSourcePosition) -> Self {
        Self::new(raw.line, raw.column, raw.offset)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
