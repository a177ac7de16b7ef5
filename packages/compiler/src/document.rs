//! Document
//!
//! One template transformation run: fold, build the tree, flag, assemble
//! phrases, rewrite helper calls and unfold. A `Document` owns all mutable state
//! of its run; the configuration is shared and read-only.

use log::{debug, warn};

use crate::config::TemplateConfig;
use crate::error::{Result, TemplateError};
use crate::i18n::flags::propagate_flags;
use crate::i18n::fold::FoldTable;
use crate::i18n::helpers::internationalize_folds;
use crate::i18n::phrase::{assemble_phrases, Segment};
use crate::ml_parser::ast::Tree;
use crate::ml_parser::parser::build_tree;
use crate::parse_util::ParseError;

#[derive(Debug, Clone)]
pub struct Document<'c> {
    source: String,
    config: &'c TemplateConfig,
    folds: FoldTable,
    tree: Option<Tree>,
    phrases: Vec<String>,
    diagnostics: Vec<ParseError>,
    processed: bool,
}

impl Document<'static> {
    /// A document using the built-in configuration
    pub fn new(source: impl Into<String>) -> Self {
        Document::with_config(source, TemplateConfig::shared())
    }
}

impl<'c> Document<'c> {
    pub fn with_config(source: impl Into<String>, config: &'c TemplateConfig) -> Self {
        Document {
            source: source.into(),
            config,
            folds: FoldTable::new(),
            tree: None,
            phrases: Vec::new(),
            diagnostics: Vec::new(),
            processed: false,
        }
    }

    /// Rewrite the source, replacing every phrase with a translation call
    ///
    /// Returns `Ok(false)` when the markup is structurally broken; the source is
    /// then left exactly as it was and one error is recorded.
    pub fn process(&mut self) -> Result<bool> {
        if self.processed {
            return Err(TemplateError::AlreadyProcessed);
        }
        self.processed = true;

        let folded = self.folds.fold(&self.source, &self.config.fold_rules);
        debug!("folded {} regions", self.folds.len());

        let result = build_tree(&folded, self.config);
        if let Some(err) = result.error {
            let error = ParseError::from(&err);
            warn!("{}", error);
            self.diagnostics.push(error);
            self.tree = Some(result.tree);
            return Ok(false);
        }
        let mut tree = result.tree;
        debug!("built tree of {} nodes", tree.len());

        propagate_flags(&mut tree);

        let mut output = String::with_capacity(folded.len());
        for segment in assemble_phrases(&tree, self.config) {
            match segment {
                Segment::Node(id) => output.push_str(&tree[id].content),
                Segment::Phrase(phrase) => {
                    output.push_str(&phrase.to_template(self.config));
                    for message in phrase.warnings() {
                        let warning = ParseError::warning(Some(phrase.location), message);
                        warn!("{}", warning);
                        self.diagnostics.push(warning);
                    }
                    self.phrases.push(phrase.phrase);
                }
            }
        }

        let helper_phrases = internationalize_folds(&mut self.folds, self.config);
        debug!(
            "extracted {} phrases and {} helper labels",
            self.phrases.len(),
            helper_phrases.len()
        );
        self.phrases.extend(helper_phrases);

        self.source = self.folds.unfold(&output);
        self.tree = Some(tree);
        Ok(true)
    }

    /// The current source: the input before processing, the rewritten template after
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// Extracted phrases in discovery order, duplicates kept
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn errors(&self) -> Vec<&ParseError> {
        self.diagnostics.iter().filter(|d| !d.is_warning()).collect()
    }

    pub fn warnings(&self) -> Vec<&ParseError> {
        self.diagnostics.iter().filter(|d| d.is_warning()).collect()
    }

    /// Errors and warnings in the order they were found
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn folds(&self) -> &FoldTable {
        &self.folds
    }

    pub fn config(&self) -> &TemplateConfig {
        self.config
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }
}
