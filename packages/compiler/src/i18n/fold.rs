//! Fold / Unfold
//!
//! Regions the markup lexer must never look into (comments, script and style
//! bodies, embedded template code) are swapped for opaque placeholder tokens
//! before tokenizing and restored once the document has been rewritten.
//!
//! A placeholder has the form `≤<index>:<category>≥`, where `index` points into
//! the append-only [`FoldTable`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

pub const SENTINEL_OPEN: char = '\u{2264}';
pub const SENTINEL_CLOSE: char = '\u{2265}';

/// `$1` fold index, `$2` fold category
pub static FOLD_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{2264}(\\d+):(\\w+)\u{2265}").unwrap());

/// Category of a folded region
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoldKind {
    HtmlDoctype,
    HtmlScript,
    HtmlStyle,
    HtmlComment,
    /// `<%= helper do %>`, opens a block whose body is not translatable
    ErbDo,
    ErbEnd,
    /// `<%= expr %>`, the only category that renders output inside a phrase
    ErbExpression,
    ErbComment,
    ErbCode,
    /// A category this crate does not know; handled like any non-output fold
    Other(String),
}

impl FoldKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "html_doctype" => FoldKind::HtmlDoctype,
            "html_script" => FoldKind::HtmlScript,
            "html_style" => FoldKind::HtmlStyle,
            "html_comment" => FoldKind::HtmlComment,
            "erb_do" => FoldKind::ErbDo,
            "erb_end" => FoldKind::ErbEnd,
            "erb_expression" => FoldKind::ErbExpression,
            "erb_comment" => FoldKind::ErbComment,
            "erb_code" => FoldKind::ErbCode,
            other => FoldKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FoldKind::HtmlDoctype => "html_doctype",
            FoldKind::HtmlScript => "html_script",
            FoldKind::HtmlStyle => "html_style",
            FoldKind::HtmlComment => "html_comment",
            FoldKind::ErbDo => "erb_do",
            FoldKind::ErbEnd => "erb_end",
            FoldKind::ErbExpression => "erb_expression",
            FoldKind::ErbComment => "erb_comment",
            FoldKind::ErbCode => "erb_code",
            FoldKind::Other(name) => name,
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self, FoldKind::ErbExpression)
    }

    pub fn is_block_open(&self) -> bool {
        matches!(self, FoldKind::ErbDo)
    }
}

impl fmt::Display for FoldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One folding rule: every match of `pattern` becomes a fold of `kind`
#[derive(Debug, Clone)]
pub struct FoldRule {
    pub kind: FoldKind,
    pub pattern: Regex,
}

impl FoldRule {
    pub fn new(kind: FoldKind, pattern: &str) -> Result<Self> {
        Ok(FoldRule {
            kind,
            pattern: Regex::new(pattern)?,
        })
    }
}

static DEFAULT_FOLD_RULES: Lazy<Vec<FoldRule>> = Lazy::new(|| {
    const RULES: &[(&str, &str)] = &[
        ("html_doctype", r"(?s)<!DOCTYPE.+?>"),
        ("html_script", r"(?s)<script[^>]*?>.+?</script>"),
        ("html_style", r"(?s)<style[^>]*?>.+?</style>"),
        ("html_comment", r"(?s)<!--.+?-->"),
        ("erb_do", r"<%=\s*(.+)\s+do\s*-?%>"),
        ("erb_end", r"(?s)<%-?\s*end\s*-?%>"),
        ("erb_expression", r"(?s)<%=(.*?)%>"),
        ("erb_comment", r"(?s)<%#(.*?)%>"),
        ("erb_code", r"(?s)<%[^=](.*?)%>"),
    ];

    RULES
        .iter()
        .map(|(name, pattern)| FoldRule {
            kind: FoldKind::from_name(name),
            pattern: Regex::new(pattern).unwrap(),
        })
        .collect()
});

/// Built-in rules, applied in this order
pub fn default_fold_rules() -> Vec<FoldRule> {
    DEFAULT_FOLD_RULES.clone()
}

/// Placeholder text for fold `index`
pub fn fold_token(index: usize, kind: &FoldKind) -> String {
    format!("{}{}:{}{}", SENTINEL_OPEN, index, kind, SENTINEL_CLOSE)
}

/// Read a placeholder back into its index and category
pub fn parse_fold_token(token: &str) -> Option<(usize, FoldKind)> {
    let caps = FOLD_TOKEN_PATTERN.captures(token)?;
    if caps.get(0)?.as_str().len() != token.len() {
        return None;
    }
    let index = caps[1].parse().ok()?;
    Some((index, FoldKind::from_name(&caps[2])))
}

/// Append-only side table holding the original text of every fold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldTable {
    entries: Vec<String>,
}

impl FoldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every match of every rule, in rule order, with a placeholder
    pub fn fold(&mut self, source: &str, rules: &[FoldRule]) -> String {
        let mut text = source.to_string();
        for rule in rules {
            let entries = &mut self.entries;
            let replaced = rule.pattern.replace_all(&text, |caps: &Captures| {
                let token = fold_token(entries.len(), &rule.kind);
                entries.push(caps[0].to_string());
                token
            });
            text = replaced.into_owned();
        }
        text
    }

    /// Restore every placeholder in `text`
    ///
    /// A fold can hold placeholders of earlier folds, so restored text is unfolded
    /// again. Tokens pointing outside the table are left untouched.
    pub fn unfold(&self, text: &str) -> String {
        self.unfold_bounded(text, self.entries.len())
    }

    // Only indices below `limit` are expanded, which bounds the recursion.
    fn unfold_bounded(&self, text: &str, limit: usize) -> String {
        FOLD_TOKEN_PATTERN
            .replace_all(text, |caps: &Captures| {
                match caps[1].parse::<usize>() {
                    Ok(index) if index < limit => self.unfold_bounded(&self.entries[index], index),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.entries.iter_mut()
    }
}
