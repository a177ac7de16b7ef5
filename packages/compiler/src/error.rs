//! Error Types
//!
//! Errors raised by the template transformation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring or running a transformation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A close tag did not match the innermost open tag
    #[error("attempt to close {open} with {close}")]
    TagMismatch {
        open: String,
        close: String,
        line: usize,
    },

    /// A close tag appeared with no open tag left on the stack
    #[error("extra close tag {name}")]
    ExtraCloseTag { name: String, line: usize },

    #[error("document is already processed")]
    AlreadyProcessed,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid message table: {0}")]
    MessageTable(String),

    #[error("failed to read '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl TemplateError {
    /// Source line the error points at, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::TagMismatch { line, .. } | TemplateError::ExtraCloseTag { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    /// Structural errors abort a transformation run
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TemplateError::TagMismatch { .. } | TemplateError::ExtraCloseTag { .. }
        )
    }
}

impl From<regex::Error> for TemplateError {
    fn from(err: regex::Error) -> Self {
        TemplateError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
