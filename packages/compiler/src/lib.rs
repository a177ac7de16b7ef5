#![deny(clippy::all)]

/**
 * i18n Template Compiler
 *
 * Finds translatable phrases in HTML/ERB templates, rewrites them into
 * translation calls and expands translated keys back into markup at render time.
 */

// Core modules
pub mod config;
pub mod document;
mod error;
pub mod parse_util;
pub mod util;

// Parser and transformation modules
pub mod i18n;
pub mod ml_parser;

// Re-exports
pub use config::{TemplateConfig, TemplateOptions};
pub use document::Document;
pub use error::{Result, TemplateError};
pub use i18n::extractor::{CatalogFormat, PhraseCatalog};
pub use i18n::translation::{
    register_translator, translate, translate_with_wrappers, Interpolator, MessageTable,
    Translator,
};
pub use parse_util::{ParseError, ParseErrorLevel, ParseLocation};

/// Process `source` with the built-in configuration and return the rewritten template
///
/// Structurally broken markup is returned unchanged.
pub fn process_template(source: &str) -> Result<String> {
    let mut document = Document::new(source);
    document.process()?;
    Ok(document.into_source())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_template() {
        assert_eq!(
            process_template("<h1>Title</h1>").unwrap(),
            "<h1><%= I18nTemplate.t(\"Title\") %></h1>"
        );
        assert_eq!(process_template("</b>").unwrap(), "</b>");
    }
}
