#![deny(clippy::all)]

/**
 * i18n Template CLI
 *
 * Command runners for template rewriting and phrase extraction
 */
pub use i18n_template as compiler;

pub mod extract_phrases;
pub mod show_template;

use anyhow::Result;
use std::path::Path;

use i18n_template::TemplateConfig;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The configuration at `path`, or the built-in one
pub fn load_config(path: Option<&Path>) -> Result<TemplateConfig> {
    match path {
        Some(path) => Ok(TemplateConfig::from_json_file(path)?),
        None => Ok(TemplateConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{ "translate_call": "t" }"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.translate_call, "t");
    }

    #[test]
    fn test_load_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config.translate_call, "I18nTemplate.t");
    }
}
