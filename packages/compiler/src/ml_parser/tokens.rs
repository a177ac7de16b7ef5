//! ML Parser Tokens
//!
//! Tokens handed from the lexer to the tree builder. A token is either a whole
//! open tag, a whole close tag, or a run of opaque content between tags.

use crate::parse_util::ParseLocation;
use serde::{Deserialize, Serialize};

/// Token types for markup parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    /// `<name ...>` or `<name ... />`, with the lower-cased tag name
    TagOpen(String),
    /// `</name>`, with the lower-cased tag name
    TagClose(String),
    /// Anything else: text, fold placeholders, declarations
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    /// Raw token text exactly as it appears in the source
    pub text: String,
    pub location: ParseLocation,
}

impl Token {
    pub fn new(token_type: TokenType, text: String, location: ParseLocation) -> Self {
        Token {
            token_type,
            text,
            location,
        }
    }

    pub fn is_open_tag(&self) -> bool {
        matches!(self.token_type, TokenType::TagOpen(_))
    }

    pub fn is_close_tag(&self) -> bool {
        matches!(self.token_type, TokenType::TagClose(_))
    }

    /// Tag name for tag tokens
    pub fn tag_name(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::TagOpen(name) | TokenType::TagClose(name) => Some(name),
            TokenType::Content => None,
        }
    }
}
