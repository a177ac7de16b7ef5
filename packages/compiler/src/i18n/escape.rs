//! Reserved character escaping for phrase keys
//!
//! `"`, `[`, `]`, `{` and `}` carry meaning in the placeholder grammar, so text
//! is written with `[quot]`, `[lsb]`, `[rsb]`, `[lcb]` and `[rcb]` instead.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static UNESCAPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(quot|lsb|rsb|lcb|rcb|ns)\]").unwrap());

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("[quot]"),
            '[' => out.push_str("[lsb]"),
            ']' => out.push_str("[rsb]"),
            '{' => out.push_str("[lcb]"),
            '}' => out.push_str("[rcb]"),
            _ => out.push(c),
        }
    }
    out
}

/// Single pass, so an unescaped result is never unescaped twice
pub fn unescape(text: &str) -> String {
    UNESCAPE_PATTERN
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "quot" => "\"",
            "lsb" => "[",
            "rsb" => "]",
            "lcb" => "{",
            "rcb" => "}",
            _ => "#",
        })
        .into_owned()
}

/// Double-quoted string literal for generated template code
///
/// Backslashes and quotes are escaped, `#` is escaped where it would start an
/// interpolation, control characters use their escape sequences.
pub fn quote_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '#' if matches!(chars.peek(), Some('{') | Some('$') | Some('@')) => {
                out.push_str("\\#")
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{08}' => out.push_str("\\b"),
            '\u{07}' => out.push_str("\\a"),
            '\u{1b}' => out.push_str("\\e"),
            c if c.is_ascii_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
