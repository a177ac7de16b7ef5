//! Parse Utilities
//!
//! Source locations and the diagnostics reported by a transformation run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TemplateError;

/// A position in the processed source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseLocation {
    /// Byte offset from the start of the source
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
}

impl ParseLocation {
    pub fn new(offset: usize, line: usize) -> Self {
        ParseLocation { offset, line }
    }

    /// Location of `offset` inside `source`
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let line = source.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        ParseLocation { offset, line }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

/// A human readable diagnostic, optionally tied to a source line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseError {
    pub location: Option<ParseLocation>,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(location: Option<ParseLocation>, msg: String) -> Self {
        ParseError {
            location,
            msg,
            level: ParseErrorLevel::Error,
        }
    }

    pub fn warning(location: Option<ParseLocation>, msg: String) -> Self {
        ParseError {
            location,
            msg,
            level: ParseErrorLevel::Warning,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level == ParseErrorLevel::Warning
    }

    pub fn line(&self) -> Option<usize> {
        self.location.map(|loc| loc.line)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "[SOURCE:{}]: {}", location.line, self.msg),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl From<&TemplateError> for ParseError {
    fn from(err: &TemplateError) -> Self {
        let location = err.line().map(|line| ParseLocation::new(0, line));
        ParseError::new(location, err.to_string())
    }
}
