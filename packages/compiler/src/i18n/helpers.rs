//! View helper internationalization
//!
//! Folded template code is opaque to the tree builder, so helper calls with a
//! literal label, such as `link_to 'Show', @post`, are rewritten textually:
//! the literal becomes a translate call and is recorded as a phrase.

use regex::{Captures, Regex};

use super::escape::quote_literal;
use super::fold::FoldTable;
use crate::config::TemplateConfig;

/// Rewrite helper calls in one piece of template code
///
/// Returns the rewritten code and the extracted phrases in order of appearance.
pub fn internationalize_helpers(
    code: &str,
    pattern: &Regex,
    translate_call: &str,
) -> (String, Vec<String>) {
    let mut phrases = Vec::new();
    let rewritten = pattern.replace_all(code, |caps: &Captures| {
        let literal = match (caps.get(3), caps.get(4)) {
            (Some(double), _) => double.as_str().to_string(),
            (None, Some(single)) => single.as_str().replace('"', "&quot;"),
            (None, None) => String::new(),
        };
        let call = format!(
            "{}{}{}({})",
            &caps[1],
            &caps[2],
            translate_call,
            quote_literal(&literal)
        );
        phrases.push(literal);
        call
    });
    (rewritten.into_owned(), phrases)
}

/// Rewrite every fold in `folds` in place, returning the extracted phrases
pub fn internationalize_folds(folds: &mut FoldTable, config: &TemplateConfig) -> Vec<String> {
    let Some(pattern) = &config.helper_pattern else {
        return Vec::new();
    };

    let mut phrases = Vec::new();
    for content in folds.iter_mut() {
        let (rewritten, found) = internationalize_helpers(content, pattern, &config.translate_call);
        if !found.is_empty() {
            *content = rewritten;
            phrases.extend(found);
        }
    }
    phrases
}
