//! Intermediate representation produced by the line parser.

use crate::value::{Assignment, Value};

/// One classified physical line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Comment, blank line, or anything without a usable `key=value`.
    /// The original text is kept verbatim.
    Comment(String),
    /// `key=value`, `key:=value` or `key+=value`.
    Assign {
        /// Trimmed key, possibly dotted (`a.b.c`), operator suffix removed.
        key: String,
        assignment: Assignment,
        value: Value,
    },
}

/// A line together with its 0-based position in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedLine {
    pub number: usize,
    pub line: Line,
}
