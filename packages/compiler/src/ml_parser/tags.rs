//! ML Parser Tags
//!
//! Static tag tables and helpers for reading tag tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tags that may sit inside a phrase as wrappers
pub const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "br", "cite", "code", "dfn", "em", "i", "img",
    "input", "kbd", "label", "q", "samp", "small", "span", "strong", "sub", "sup", "textarea",
    "tt", "var", "button", "del", "ins", "map", "object",
];

/// Void elements, self-closing even when written without `/>`
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "basefont", "br", "hr", "input", "img", "link", "meta",
];

/// Default name of the attribute that controls phrase extraction
pub const I18N_ATTRIBUTE: &str = "data-i18n";

/// `$1` closing slash, `$2` tag name. E.g `a-b:c_d`
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(/)?(\w+(?::[\w_-]+)?)").unwrap());

/// Per-element extraction mode set through the i18n attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum I18nAttr {
    /// `i`: ignore the element and everything below it
    Ignore,
    /// `n`: never merge the element into a surrounding phrase
    New,
    /// `s`: always treat the element as part of a phrase
    Sub,
}

impl I18nAttr {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "i" => Some(I18nAttr::Ignore),
            "n" => Some(I18nAttr::New),
            "s" => Some(I18nAttr::Sub),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            I18nAttr::Ignore => "i",
            I18nAttr::New => "n",
            I18nAttr::Sub => "s",
        }
    }
}

/// Closing state of a tag token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Closing {
    Open,
    Close,
    SelfClose,
}

/// Split a tag token into (is_close, lower-cased name)
///
/// Returns `None` for anything that is not an element tag (`<!...>`, `<?...>`, text).
pub fn split_tag_token(token: &str) -> Option<(bool, String)> {
    let caps = TAG_PATTERN.captures(token)?;
    let closing = caps.get(1).is_some();
    let name = caps.get(2)?.as_str().to_lowercase();
    Some((closing, name))
}

/// Whether an open tag token is written in self-closing form (`<br />`)
pub fn is_self_closing_syntax(token: &str) -> bool {
    token.ends_with("/>")
}

/// Build the pattern that reads the i18n attribute out of a tag token
pub fn i18n_attr_pattern(attribute: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"{}=(?:"|')(i|n|s)(?:"|')"#,
        regex::escape(attribute)
    ))
}
