//! Phrase export
//!
//! Collects the phrases of many documents and writes them out as seed catalogs
//! for translators.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    Plain,
    Gettext,
    Json,
}

impl CatalogFormat {
    pub const ALL: [CatalogFormat; 3] =
        [CatalogFormat::Plain, CatalogFormat::Gettext, CatalogFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogFormat::Plain => "plain",
            CatalogFormat::Gettext => "gettext",
            CatalogFormat::Json => "json",
        }
    }

    /// File written when no output path is given
    pub fn default_output(&self) -> &'static str {
        match self {
            CatalogFormat::Plain => "phrases.txt",
            CatalogFormat::Gettext => "phrases.pot",
            CatalogFormat::Json => "phrases.json",
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown catalog format '{}'", s))
    }
}

const POT_HEADER: &str = r#"# SOME DESCRIPTIVE TITLE.
# Copyright (C) YEAR THE PACKAGE'S COPYRIGHT HOLDER
# This file is distributed under the same license as the PACKAGE package.
# FIRST AUTHOR <EMAIL@ADDRESS>, YEAR.
#
#, fuzzy
msgid ""
msgstr ""
"Project-Id-Version: PACKAGE VERSION\n"
"POT-Creation-Date: YEAR-MO-DA HO:MI+ZONE\n"
"PO-Revision-Date: YEAR-MO-DA HO:MI+ZONE\n"
"Last-Translator: FULL NAME <EMAIL@ADDRESS>\n"
"Language-Team: LANGUAGE <LL@li.org>\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"
"Plural-Forms: nplurals=INTEGER; plural=EXPRESSION;\n"

"#;

/// Phrase → source paths it was found in
#[derive(Debug, Clone, Default)]
pub struct PhraseCatalog {
    sources: IndexMap<String, IndexSet<String>>,
}

impl PhraseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<I, S>(&mut self, path: &str, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for phrase in phrases {
            self.sources
                .entry(phrase.into())
                .or_default()
                .insert(path.to_string());
        }
    }

    /// Fold another catalog into this one
    pub fn merge(&mut self, other: PhraseCatalog) {
        for (phrase, paths) in other.sources {
            self.sources.entry(phrase).or_default().extend(paths);
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn paths(&self, phrase: &str) -> Option<impl Iterator<Item = &str>> {
        self.sources
            .get(phrase)
            .map(|paths| paths.iter().map(String::as_str))
    }

    /// Entries sorted by phrase
    pub fn sorted(&self) -> Vec<(&str, &IndexSet<String>)> {
        let mut entries: Vec<_> = self
            .sources
            .iter()
            .map(|(phrase, paths)| (phrase.as_str(), paths))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn write(&self, format: CatalogFormat) -> String {
        match format {
            CatalogFormat::Plain => self.to_plain(),
            CatalogFormat::Gettext => self.to_gettext(),
            CatalogFormat::Json => self.to_json(),
        }
    }

    /// `# path,path` followed by the phrase, one entry per phrase
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for (phrase, paths) in self.sorted() {
            out.push_str(&format!("# {}\n{}\n", join(paths), phrase));
        }
        out
    }

    pub fn to_gettext(&self) -> String {
        let mut out = String::from(POT_HEADER);
        for (phrase, paths) in self.sorted() {
            out.push_str(&format!(
                "# {}\nmsgid {}\nmsgstr \"\"\n\n",
                join(paths),
                po_string(phrase)
            ));
        }
        out
    }

    /// A JSON object with every phrase mapped to `null`
    pub fn to_json(&self) -> String {
        let table: Map<String, Value> = self
            .sorted()
            .into_iter()
            .map(|(phrase, _)| (phrase.to_string(), Value::Null))
            .collect();
        let mut json = serde_json::to_string_pretty(&Value::Object(table)).unwrap_or_default();
        json.push('\n');
        json
    }
}

/// Double-quoted PO string; only backslash, quote, newline, tab and CR are escaped
fn po_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn join(paths: &IndexSet<String>) -> String {
    paths.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
