//! Extract Phrases
//!
//! Processes a set of templates and writes every phrase found into one catalog.

use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use i18n_template::{CatalogFormat, Document, ParseError, PhraseCatalog, TemplateConfig};

/// Output path meaning standard output
pub const STDOUT: &str = "-";

/// Options for phrase extraction.
#[derive(Debug, Clone)]
pub struct ExtractPhrasesOptions {
    pub format: CatalogFormat,
    /// Defaults to the format's file name in the working directory.
    pub output_file: Option<PathBuf>,
    /// Templates to read, glob patterns allowed.
    pub source_files: Vec<String>,
    /// Print per-file diagnostics to stderr.
    pub verbose: bool,
}

impl ExtractPhrasesOptions {
    pub fn new(format: CatalogFormat, source_files: Vec<String>) -> Self {
        ExtractPhrasesOptions {
            format,
            output_file: None,
            source_files,
            verbose: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.format.default_output()))
    }
}

/// Result of phrase extraction.
#[derive(Debug, Clone)]
pub struct ExtractPhrasesResult {
    /// The written catalog.
    pub output: String,
    /// Number of distinct phrases.
    pub phrase_count: usize,
    /// Files that could not be read or are structurally broken.
    pub failures: Vec<String>,
}

impl ExtractPhrasesResult {
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Phrases of one template plus what went wrong with it
struct FileOutcome {
    path: String,
    phrases: Vec<String>,
    diagnostics: Vec<ParseError>,
    failure: Option<String>,
}

/// Extract phrases from every source file and write the catalog.
///
/// A broken file is reported in the result; the remaining files are still
/// extracted and the catalog is written.
pub fn extract_phrases(
    options: &ExtractPhrasesOptions,
    config: &TemplateConfig,
) -> Result<ExtractPhrasesResult> {
    let paths = expand_paths(&options.source_files)?;

    let outcomes: Vec<FileOutcome> = paths
        .par_iter()
        .map(|path| extract_file(path, config))
        .collect();

    let mut catalog = PhraseCatalog::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        if options.verbose {
            for diagnostic in &outcome.diagnostics {
                eprintln!("{}: {}", outcome.path, diagnostic);
            }
        }
        if let Some(failure) = outcome.failure {
            warn!("{}", failure);
            failures.push(failure);
        }
        catalog.add(&outcome.path, outcome.phrases);
    }

    let output_path = options.output_path();
    info!(
        "Extracting {} phrases to {}",
        catalog.len(),
        output_path.display()
    );
    let output = catalog.write(options.format);
    write_output(&output_path, &output)?;

    Ok(ExtractPhrasesResult {
        output,
        phrase_count: catalog.len(),
        failures,
    })
}

fn extract_file(path: &Path, config: &TemplateConfig) -> FileOutcome {
    let display = path.display().to_string();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            return FileOutcome {
                failure: Some(format!("{}: {}", display, err)),
                path: display,
                phrases: Vec::new(),
                diagnostics: Vec::new(),
            }
        }
    };

    let mut document = Document::with_config(source, config);
    let failure = match document.process() {
        Ok(true) => None,
        Ok(false) => Some(match document.errors().first() {
            Some(error) => format!("{}: {}", display, error),
            None => format!("{}: could not be processed", display),
        }),
        Err(err) => Some(format!("{}: {}", display, err)),
    };

    FileOutcome {
        phrases: document.phrases().to_vec(),
        diagnostics: document.diagnostics().to_vec(),
        path: display,
        failure,
    }
}

/// Expand glob patterns; plain paths are kept as given
pub fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let matches =
            glob::glob(pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))?;
        for entry in matches {
            paths.push(entry.with_context(|| format!("failed to expand '{}'", pattern))?);
        }
    }
    Ok(paths)
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == STDOUT {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .context("failed to write to stdout")?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write '{}'", path.display()))
}
