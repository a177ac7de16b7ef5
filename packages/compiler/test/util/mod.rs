#![allow(dead_code)]

/**
 * Test Utilities
 *
 * Helpers shared by the document, tree builder and translation suites
 */
use i18n_template::ml_parser::ast::{NodeKind, Tree};
use i18n_template::Document;

/// Process `source` with the built-in configuration
pub fn process(source: &str) -> (bool, Document<'static>) {
    let mut document = Document::new(source);
    let ok = document.process().expect("first process call");
    (ok, document)
}

/// Rewritten source of a document that must process cleanly
pub fn transform(source: &str) -> String {
    let (ok, document) = process(source);
    assert!(ok, "unexpected errors: {:?}", document.errors());
    document.source().to_string()
}

/// Template emitted for a phrase without placeholders
pub fn call(phrase: &str) -> String {
    format!("<%= I18nTemplate.t(\"{}\") %>", phrase)
}

/// Template emitted for a phrase with placeholders
pub fn call_with_values(phrase: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::from("<%- i18n_values = {} -%>");
    for (key, content) in values {
        out.push_str(&format!(
            "<%- i18n_values['{}'] = capture do -%>{}<%- end -%>",
            key, content
        ));
    }
    out.push_str(&format!(
        "<%= I18nTemplate.t(\"{}\", i18n_values) %>",
        phrase
    ));
    out
}

/// One line per node: depth-indented kind and content
pub fn humanize_tree(tree: &Tree) -> Vec<String> {
    tree.iter()
        .skip(1)
        .map(|(_, node)| {
            let mut depth = 0;
            let mut parent = node.parent;
            while let Some(p) = parent {
                if p == 0 {
                    break;
                }
                depth += 1;
                parent = tree[p].parent;
            }
            let kind = match &node.kind {
                NodeKind::Root => "root".to_string(),
                NodeKind::Tag(_) => "tag".to_string(),
                NodeKind::Text => "text".to_string(),
                NodeKind::Fold { kind, .. } => format!("fold:{}", kind),
            };
            format!("{}{} {:?}", "  ".repeat(depth), kind, node.content)
        })
        .collect()
}
