//! Runtime translation
//!
//! Expands a phrase key (or its translation) back into markup at render time.
//! Two entry points exist: [`Interpolator::translate`] takes the placeholder →
//! rendered-content map built by generated templates, and
//! [`Interpolator::translate_with_wrappers`] takes whole captured wrapper
//! elements plus named variables.
//!
//! Missing wrappers and variables are replaced by nothing; interpolation never
//! fails.

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use super::escape::unescape;
use crate::error::{Result, TemplateError};

/// Prepended to keys that have no translation
pub const UNTRANSLATED_MARKER: &str = "~";

pub const LINE_BREAK: &str = "<br />";

/// `[1]`, `[/1]`, `[1/]`, `{1}`
static VALUE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\]|\[/\d+\]|\[\d+/\]|\{\d+\}").unwrap());

/// `{}`, `{name}` as $1, `[n]` / `[/n]` as $2 $3, `[n/]` as $4
static WRAPPER_OR_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\}|\{([^}]+)\}|\[(/?)(\d+)\]|\[(\d+)/\]").unwrap());

/// Build-time marker attributes left inside captured wrappers
static MARKER_ATTRIBUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s+(?:i18n_wrapper="\d+"|(?:data-)?i18n="\w")"#).unwrap());

/// Translation lookup backend
pub trait Translator: Send + Sync {
    /// The translation of `key`, or `None` when there is none
    fn lookup(&self, key: &str) -> Option<String>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// In-memory key → translation table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTable {
    messages: IndexMap<String, String>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, key: &str, translation: &str) -> Self {
        self.insert(key, translation);
        self
    }

    pub fn insert(&mut self, key: &str, translation: &str) {
        self.messages.insert(key.to_string(), translation.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Load a flat JSON object of key → translation
    ///
    /// Keys starting with `@` hold metadata and are skipped, as are `null`
    /// values (phrases nobody has translated yet).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| TemplateError::MessageTable(e.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(TemplateError::MessageTable(
                "expected a JSON object at the top level".to_string(),
            ));
        };

        let mut table = MessageTable::new();
        for (key, value) in entries {
            if key.starts_with('@') {
                continue;
            }
            match value {
                Value::String(translation) => table.insert(&key, &translation),
                Value::Null => {}
                other => {
                    return Err(TemplateError::MessageTable(format!(
                        "translation of '{}' must be a string, found {}",
                        key, other
                    )))
                }
            }
        }
        debug!("loaded {} translations", table.len());
        Ok(table)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }
}

impl Translator for MessageTable {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

static TRANSLATOR: Lazy<RwLock<Arc<dyn Translator>>> =
    Lazy::new(|| RwLock::new(Arc::new(MessageTable::new())));

/// Replace the process-wide translator; later calls see the new one
pub fn register_translator(translator: Arc<dyn Translator>) {
    *TRANSLATOR.write().unwrap_or_else(PoisonError::into_inner) = translator;
}

pub fn current_translator() -> Arc<dyn Translator> {
    TRANSLATOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// [`Interpolator::translate`] with the process-wide translator
pub fn translate(key: &str, values: &IndexMap<String, String>) -> String {
    Interpolator::new(current_translator()).translate(key, values)
}

/// [`Interpolator::translate_with_wrappers`] with the process-wide translator
pub fn translate_with_wrappers(
    key: &str,
    wrappers: &[&str],
    variables: &IndexMap<String, String>,
) -> String {
    Interpolator::new(current_translator()).translate_with_wrappers(key, wrappers, variables)
}

#[derive(Clone)]
pub struct Interpolator {
    translator: Arc<dyn Translator>,
}

impl Interpolator {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Interpolator { translator }
    }

    /// The translation of `key`, or the marked key itself
    pub fn lookup(&self, key: &str) -> String {
        self.translator
            .lookup(key)
            .unwrap_or_else(|| format!("{}{}", UNTRANSLATED_MARKER, key))
    }

    /// Expand `key` using captured placeholder values
    pub fn translate(&self, key: &str, values: &IndexMap<String, String>) -> String {
        let phrase = self.lookup(key);
        let phrase = VALUE_PLACEHOLDER.replace_all(&phrase, |caps: &Captures| {
            values.get(&caps[0]).cloned().unwrap_or_default()
        });
        unescape(&phrase.replace("[nl]", LINE_BREAK))
    }

    /// Expand `key` using whole wrapper elements and named variables
    ///
    /// Wrapper `n` is split where its first closing tag begins: `[n]` takes the
    /// part before, `[/n]` the rest and `[n/]` the whole element.
    pub fn translate_with_wrappers(
        &self,
        key: &str,
        wrappers: &[&str],
        variables: &IndexMap<String, String>,
    ) -> String {
        let phrase = self.lookup(key);
        let phrase = WRAPPER_OR_VARIABLE.replace_all(&phrase, |caps: &Captures| {
            if let Some(index) = caps.get(4) {
                return wrapper(wrappers, index.as_str()).to_string();
            }
            if let Some(index) = caps.get(3) {
                let (open, close) = split_wrapper(wrapper(wrappers, index.as_str()));
                let closing = caps.get(2).map_or(false, |slash| !slash.as_str().is_empty());
                return if closing { close } else { open }.to_string();
            }
            let name = caps.get(1).map_or("", |name| name.as_str());
            variables.get(name).cloned().unwrap_or_default()
        });
        let phrase = unescape(&phrase.replace("[nl]", LINE_BREAK));
        MARKER_ATTRIBUTES.replace_all(&phrase, "").into_owned()
    }
}

fn wrapper<'w>(wrappers: &[&'w str], index: &str) -> &'w str {
    index
        .parse::<usize>()
        .ok()
        .and_then(|i| wrappers.get(i).copied())
        .unwrap_or("")
}

/// `<a><b>x</b></a>` → (`<a><b>x`, `</b></a>`); no closing tag → both empty
fn split_wrapper(wrapper: &str) -> (&str, &str) {
    match wrapper.find("</") {
        Some(at) => wrapper.split_at(at),
        None => ("", ""),
    }
}
