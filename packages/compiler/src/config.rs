//! Configuration
//!
//! `TemplateOptions` is the serializable form read from JSON; `TemplateConfig`
//! is the compiled, read-only value every transformation runs against.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TemplateError};
use crate::i18n::fold::{default_fold_rules, FoldRule};
use crate::ml_parser::tags::{i18n_attr_pattern, I18N_ATTRIBUTE, INLINE_TAGS, SELF_CLOSING_TAGS};

/// View helpers whose literal label argument gets translated
pub const HELPERS: &[&str] = &[
    "button_to",
    "field_set_tag",
    "label_tag",
    "link_to",
    "link_to_remote",
    "submit_tag",
];

pub const TRANSLATE_CALL: &str = "I18nTemplate.t";
pub const VALUES_VARIABLE: &str = "i18n_values";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateOptions {
    pub inline_tags: Vec<String>,
    pub self_closing_tags: Vec<String>,
    pub helpers: Vec<String>,
    /// Function called by generated templates, e.g. `I18nTemplate.t`
    pub translate_call: String,
    /// Local variable holding captured placeholder values
    pub values_variable: String,
    pub i18n_attribute: String,
    /// Emit `[nl]` instead of a wrapper for `br` tags inside phrases
    pub line_break_placeholder: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        TemplateOptions {
            inline_tags: owned(INLINE_TAGS),
            self_closing_tags: owned(SELF_CLOSING_TAGS),
            helpers: owned(HELPERS),
            translate_call: TRANSLATE_CALL.to_string(),
            values_variable: VALUES_VARIABLE.to_string(),
            i18n_attribute: I18N_ATTRIBUTE.to_string(),
            line_break_placeholder: false,
        }
    }
}

static SHARED: Lazy<TemplateConfig> = Lazy::new(|| {
    TemplateConfig::from_options(&TemplateOptions::default())
        .expect("built-in template configuration must compile")
});

#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub fold_rules: Vec<FoldRule>,
    pub inline_tags: IndexSet<String>,
    pub self_closing_tags: IndexSet<String>,
    /// `None` when no helper names are configured
    pub helper_pattern: Option<Regex>,
    pub i18n_attr_pattern: Regex,
    pub translate_call: String,
    pub values_variable: String,
    pub line_break_placeholder: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        SHARED.clone()
    }
}

impl TemplateConfig {
    /// Process-wide built-in configuration
    pub fn shared() -> &'static TemplateConfig {
        &SHARED
    }

    pub fn from_options(options: &TemplateOptions) -> Result<Self> {
        if options.translate_call.trim().is_empty() {
            return Err(TemplateError::Config("translate_call must not be empty".into()));
        }
        if options.values_variable.trim().is_empty() {
            return Err(TemplateError::Config("values_variable must not be empty".into()));
        }
        if options.i18n_attribute.trim().is_empty() {
            return Err(TemplateError::Config("i18n_attribute must not be empty".into()));
        }

        let lower = |list: &[String]| list.iter().map(|s| s.to_lowercase()).collect();

        Ok(TemplateConfig {
            fold_rules: default_fold_rules(),
            inline_tags: lower(&options.inline_tags),
            self_closing_tags: lower(&options.self_closing_tags),
            helper_pattern: helper_pattern(&options.helpers)?,
            i18n_attr_pattern: i18n_attr_pattern(&options.i18n_attribute)?,
            translate_call: options.translate_call.clone(),
            values_variable: options.values_variable.clone(),
            line_break_placeholder: options.line_break_placeholder,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: TemplateOptions =
            serde_json::from_str(json).map_err(|e| TemplateError::Config(e.to_string()))?;
        Self::from_options(&options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    pub fn is_inline(&self, name: &str) -> bool {
        self.inline_tags.contains(name)
    }

    pub fn is_self_closing(&self, name: &str) -> bool {
        self.self_closing_tags.contains(name)
    }
}

/// `$1` helper name, `$2` separator, `$3` double-quoted or `$4` single-quoted literal
fn helper_pattern(helpers: &[String]) -> Result<Option<Regex>> {
    if helpers.is_empty() {
        return Ok(None);
    }
    let names: Vec<String> = helpers.iter().map(|h| regex::escape(h)).collect();
    let pattern = format!(
        r#"({})([\s\(]*)(?:"([\w\s/']*)"|'([\w\s/"]*)')"#,
        names.join("|")
    );
    Ok(Some(Regex::new(&pattern)?))
}
