//! Utility Functions
//!
//! Text helpers shared by flag propagation and phrase assembly

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// `&#169;`, `&copy;`
static HTML_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(#\d+|\w+);").unwrap());

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\r\n]+").unwrap());

/// Whitespace as the phrase grammar sees it: space, tab, CR, LF, FF, VT
pub fn is_layout_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{0c}' | '\u{0b}')
}

pub fn strip_html_entities(text: &str) -> Cow<'_, str> {
    HTML_ENTITY.replace_all(text, "")
}

/// Whether `text` shows anything once character references are removed
pub fn has_visible_text(text: &str) -> bool {
    strip_html_entities(text).chars().any(|c| !c.is_whitespace())
}

/// Split `text` into (leading whitespace, body, trailing whitespace)
pub fn split_layout(text: &str) -> (&str, &str, &str) {
    let body_start = text.len() - text.trim_start_matches(is_layout_space).len();
    let rest = &text[body_start..];
    let body_end = rest.trim_end_matches(is_layout_space).len();
    (&text[..body_start], &rest[..body_end], &rest[body_end..])
}

/// Collapse every run of tab, CR and LF into one space
pub fn collapse_line_breaks(text: &str) -> Cow<'_, str> {
    LINE_BREAKS.replace_all(text, " ")
}
