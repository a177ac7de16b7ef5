//! ML Parser Lexer
//!
//! Splits folded template source into whole-tag tokens and content tokens.
//! Only tag boundaries are located; attributes are never parsed.

use super::tags::split_tag_token;
use super::tokens::{Token, TokenType};
use crate::parse_util::ParseLocation;

/// Tokenize the whole source at once
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Streaming tokenizer over a source string
///
/// A `<` starts a tag only when followed by a letter or by `/` and a letter; any
/// other `<` is ordinary content.
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            offset: 0,
            line: 1,
        }
    }

    /// 1-based line of the next token
    pub fn line(&self) -> usize {
        self.line
    }

    /// Byte offset of the next token
    pub fn position(&self) -> usize {
        self.offset
    }

    fn starts_tag(&self, at: usize) -> bool {
        let bytes = self.source.as_bytes();
        if bytes.get(at) != Some(&b'<') {
            return false;
        }
        match bytes.get(at + 1) {
            Some(c) if c.is_ascii_alphabetic() => true,
            Some(b'/') => matches!(bytes.get(at + 2), Some(c) if c.is_ascii_alphabetic()),
            _ => false,
        }
    }

    /// End (exclusive) of the tag starting at `start`
    ///
    /// Quoted attribute values may contain `>`. When quotes never balance the tag
    /// ends at the first `>` instead.
    fn tag_end(&self, start: usize) -> Option<usize> {
        let bytes = self.source.as_bytes();
        let mut quote: Option<u8> = None;
        for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => return Some(i + 1),
                None => {}
            }
        }
        self.source[start..].find('>').map(|i| start + i + 1)
    }

    fn text_end(&self, start: usize) -> usize {
        let mut pos = start;
        while let Some(i) = self.source[pos..].find('<') {
            let at = pos + i;
            if at > start && self.starts_tag(at) {
                return at;
            }
            pos = at + 1;
        }
        self.source.len()
    }

    fn consume(&mut self, end: usize, token_type: TokenType) -> Token {
        let text = &self.source[self.offset..end];
        let location = ParseLocation::new(self.offset, self.line);
        self.line += text.matches('\n').count();
        self.offset = end;
        Token::new(token_type, text.to_string(), location)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.offset >= self.source.len() {
            return None;
        }

        if self.starts_tag(self.offset) {
            if let Some(end) = self.tag_end(self.offset) {
                let token_type = match split_tag_token(&self.source[self.offset..end]) {
                    Some((true, name)) => TokenType::TagClose(name),
                    Some((false, name)) => TokenType::TagOpen(name),
                    None => TokenType::Content,
                };
                return Some(self.consume(end, token_type));
            }
            // An unterminated tag swallows the rest of the source as content.
            return Some(self.consume(self.source.len(), TokenType::Content));
        }

        let end = self.text_end(self.offset);
        Some(self.consume(end, TokenType::Content))
    }
}
