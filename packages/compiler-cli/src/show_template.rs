//! Show Template
//!
//! Processes a single template and returns the rewritten source.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use i18n_template::{Document, TemplateConfig};

pub fn show_template(path: &Path, config: &TemplateConfig, verbose: bool) -> Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;

    let mut document = Document::with_config(source, config);
    let processed = document.process()?;
    if verbose {
        for diagnostic in document.diagnostics() {
            eprintln!("{}: {}", path.display(), diagnostic);
        }
    }
    if !processed {
        match document.errors().first() {
            Some(error) => bail!("{}: {}", path.display(), error),
            None => bail!("{}: could not be processed", path.display()),
        }
    }
    Ok(document.into_source())
}
