//! Phrase assembly
//!
//! Consecutive phrase-flagged nodes (in document order) form one phrase. A
//! phrase is serialized into a key string where markup becomes numbered
//! wrapper placeholders (`[n]`, `[/n]`, `[n/]`) and output expressions become
//! variable placeholders (`{m}`), plus an ordered placeholder → markup map.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::escape::{escape, quote_literal};
use super::fold::{SENTINEL_CLOSE, SENTINEL_OPEN};
use crate::config::TemplateConfig;
use crate::ml_parser::ast::{Flag, NodeId, NodeKind, Tree};
use crate::ml_parser::tags::{Closing, I18nAttr};
use crate::parse_util::ParseLocation;
use crate::util::{collapse_line_breaks, has_visible_text, split_layout};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\]|\[/\d+\]|\[\d+/\]|\{\d+\}|\[nl\]").unwrap());

pub const UNBALANCED_WRAPPER: &str = "UNBALANCED WRAPPER";
pub const EMPTY_PHRASE: &str = "EMPTY PHRASE";
pub const UNRESOLVED_MARKER: &str = "UNRESOLVED MARKER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// Source nodes, in document order
    pub nodes: Vec<NodeId>,
    /// The key string
    pub phrase: String,
    /// Placeholder → original markup, in order of appearance
    pub attributes: IndexMap<String, String>,
    pub prefix: String,
    pub suffix: String,
    pub location: ParseLocation,
    /// A wrapper was opened or closed outside this phrase
    unbalanced: bool,
}

impl Phrase {
    /// Build the key and placeholder map for `nodes`
    pub fn build(tree: &Tree, nodes: Vec<NodeId>, config: &TemplateConfig) -> Self {
        let mut key = String::new();
        let mut attributes = IndexMap::new();
        let mut wrappers = 0usize;
        let mut variables = 0usize;
        let mut open_wrappers: SmallVec<[usize; 8]> = SmallVec::new();
        let mut unbalanced = false;

        for &id in &nodes {
            let node = &tree[id];
            let placeholder = match &node.kind {
                NodeKind::Tag(tag) => match tag.closing {
                    Closing::Open => {
                        wrappers += 1;
                        open_wrappers.push(wrappers);
                        format!("[{}]", wrappers)
                    }
                    Closing::SelfClose if config.line_break_placeholder && tag.name == "br" => {
                        key.push_str("[nl]");
                        continue;
                    }
                    Closing::SelfClose => {
                        wrappers += 1;
                        format!("[{}/]", wrappers)
                    }
                    Closing::Close => {
                        let index = open_wrappers.pop().unwrap_or_else(|| {
                            unbalanced = true;
                            wrappers += 1;
                            wrappers
                        });
                        format!("[/{}]", index)
                    }
                },
                NodeKind::Fold { .. } => {
                    variables += 1;
                    format!("{{{}}}", variables)
                }
                NodeKind::Text => {
                    key.push_str(&escape(&node.content));
                    continue;
                }
                NodeKind::Root => continue,
            };
            key.push_str(&placeholder);
            attributes.insert(placeholder, node.content.clone());
        }
        unbalanced |= !open_wrappers.is_empty();

        let (prefix, body, suffix) = split_layout(&key);
        let location = nodes
            .first()
            .map(|&id| tree[id].location)
            .unwrap_or_else(|| ParseLocation::new(0, 1));

        Phrase {
            phrase: collapse_line_breaks(body).into_owned(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            nodes,
            attributes,
            location,
            unbalanced,
        }
    }

    /// Template source replacing the phrase nodes
    pub fn to_template(&self, config: &TemplateConfig) -> String {
        let mut output = String::new();
        output.push_str(&self.prefix);

        let literal = quote_literal(&self.phrase);
        if self.attributes.is_empty() {
            output.push_str(&format!("<%= {}({}) %>", config.translate_call, literal));
        } else {
            let values = &config.values_variable;
            output.push_str(&format!("<%- {} = {{}} -%>", values));
            for (key, content) in &self.attributes {
                output.push_str(&format!(
                    "<%- {}['{}'] = capture do -%>{}<%- end -%>",
                    values, key, content
                ));
            }
            output.push_str(&format!(
                "<%= {}({}, {}) %>",
                config.translate_call, literal, values
            ));
        }

        output.push_str(&self.suffix);
        output
    }

    /// Non-fatal problems with this phrase, as messages
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.unbalanced {
            warnings.push(format!("{}: {}", UNBALANCED_WRAPPER, self.phrase));
        }
        if !has_visible_text(&PLACEHOLDER.replace_all(&self.phrase, "")) {
            warnings.push(format!("{}: {}", EMPTY_PHRASE, self.phrase));
        }
        if self.phrase.contains([SENTINEL_OPEN, SENTINEL_CLOSE]) {
            warnings.push(format!("{}: {}", UNRESOLVED_MARKER, self.phrase));
        }
        warnings
    }
}

/// A piece of the rewritten document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A node emitted unchanged
    Node(NodeId),
    Phrase(Phrase),
}

/// Group the flagged tree into unchanged nodes and phrases, in document order
pub fn assemble_phrases(tree: &Tree, config: &TemplateConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut run: Vec<NodeId> = Vec::new();

    for (id, node) in tree.iter().skip(1) {
        if node.flag == Flag::Phrase {
            run.push(id);
            continue;
        }
        flush_run(tree, std::mem::take(&mut run), config, &mut segments);
        segments.push(Segment::Node(id));
    }
    flush_run(tree, run, config, &mut segments);

    segments
}

fn flush_run(tree: &Tree, run: Vec<NodeId>, config: &TemplateConfig, out: &mut Vec<Segment>) {
    // <b><i>text</i></b>: keep the wrapper markup, translate what is inside
    let (mut start, mut end) = (0, run.len());
    while is_single_wrapper(tree, &run[start..end]) {
        out.push(Segment::Node(run[start]));
        start += 1;
        end -= 1;
    }
    if start < end {
        out.push(Segment::Phrase(Phrase::build(tree, run[start..end].to_vec(), config)));
    }
    out.extend(run[end..].iter().map(|&id| Segment::Node(id)));
}

/// A run that is exactly one open tag, its content and its close tag, where the
/// tag wraps a single tag or a single-child chain ending in text
fn is_single_wrapper(tree: &Tree, run: &[NodeId]) -> bool {
    let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
        return false;
    };
    if run.len() < 3 || !tree[first].is_open_tag() || tree.pair(first) != Some(last) {
        return false;
    }
    if tree[first].i18n_attr == Some(I18nAttr::Sub) {
        return false;
    }
    let children = tree.element_children(first);
    let single_tag = children.len() == 1 && tree[children[0]].tag().is_some();
    single_tag || tree.wrapped_text(first).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::flags::propagate_flags;
    use crate::i18n::fold::{FoldKind, FoldRule, FoldTable};
    use crate::ml_parser::parser::build_tree;

    fn phrases(source: &str, config: &TemplateConfig) -> Vec<Phrase> {
        let mut folds = FoldTable::new();
        let folded = folds.fold(source, &config.fold_rules);
        let mut tree = build_tree(&folded, config).tree;
        propagate_flags(&mut tree);
        assemble_phrases(&tree, config)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Phrase(phrase) => Some(phrase),
                Segment::Node(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_wrapper_placeholders() {
        let config = TemplateConfig::shared();
        let result = phrases("<div>Hello <span><b>world</b></span> today!</div>", config);
        assert_eq!(result.len(), 1);
        let phrase = &result[0];
        assert_eq!(phrase.phrase, "Hello [1][2]world[/2][/1] today!");
        let attributes: Vec<(&str, &str)> = phrase
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            attributes,
            vec![("[1]", "<span>"), ("[2]", "<b>"), ("[/2]", "</b>"), ("[/1]", "</span>")]
        );
    }

    #[test]
    fn test_literal_braces_escaped() {
        let result = phrases("<div>Hello {user}</div>", TemplateConfig::shared());
        assert_eq!(result[0].phrase, "Hello [lcb]user[rcb]");
        assert!(result[0].attributes.is_empty());
    }

    #[test]
    fn test_self_close_and_variable() {
        let result = phrases("<div>Hi<br /><%= name %></div>", TemplateConfig::shared());
        assert_eq!(result[0].phrase, "Hi[1/]{1}");
        assert_eq!(result[0].attributes["{1}"], "\u{2264}0:erb_expression\u{2265}");
    }

    #[test]
    fn test_line_break_placeholder() {
        let config = TemplateConfig::from_json_str(r#"{ "line_break_placeholder": true }"#).unwrap();
        let result = phrases("<div>Hello<br />World<br>!</div>", &config);
        assert_eq!(result[0].phrase, "Hello[nl]World[nl]!");
        assert!(result[0].attributes.is_empty());
    }

    #[test]
    fn test_prefix_and_suffix() {
        let result = phrases("<div>\n  Hello\n\nWorld  \n</div>", TemplateConfig::shared());
        assert_eq!(result[0].prefix, "\n  ");
        assert_eq!(result[0].suffix, "  \n");
        assert_eq!(result[0].phrase, "Hello World");
    }

    #[test]
    fn test_to_template_without_values() {
        let result = phrases("<h2>New \"Project\"</h2>", TemplateConfig::shared());
        assert_eq!(
            result[0].to_template(TemplateConfig::shared()),
            "<%= I18nTemplate.t(\"New [quot]Project[quot]\") %>"
        );
    }

    #[test]
    fn test_to_template_with_values() {
        let result = phrases("<p> Hi <b>you</b></p>", TemplateConfig::shared());
        assert_eq!(
            result[0].to_template(TemplateConfig::shared()),
            " <%- i18n_values = {} -%>\
             <%- i18n_values['[1]'] = capture do -%><b><%- end -%>\
             <%- i18n_values['[/1]'] = capture do -%></b><%- end -%>\
             <%= I18nTemplate.t(\"Hi [1]you[/1]\", i18n_values) %>"
        );
    }

    #[test]
    fn test_empty_phrase_warning() {
        let result = phrases("<div><span><b></b><i></i></span></div>", TemplateConfig::shared());
        assert_eq!(result[0].phrase, "[1][/1][2][/2]");
        assert_eq!(result[0].warnings(), vec!["EMPTY PHRASE: [1][/1][2][/2]".to_string()]);
    }

    #[test]
    fn test_unbalanced_wrapper_warning() {
        let result = phrases(
            "<div>Hi <span data-i18n=\"s\"><% x = 1 %>you</span></div>",
            TemplateConfig::shared(),
        );
        let keys: Vec<&str> = result.iter().map(|p| p.phrase.as_str()).collect();
        assert_eq!(keys, vec!["Hi [1]", "you[/1]"]);
        assert_eq!(result[0].warnings(), vec!["UNBALANCED WRAPPER: Hi [1]".to_string()]);
        assert_eq!(result[1].warnings(), vec!["UNBALANCED WRAPPER: you[/1]".to_string()]);
    }

    #[test]
    fn test_balanced_wrappers_have_no_warning() {
        let result = phrases("<p>Hi <b>you</b><br /></p>", TemplateConfig::shared());
        assert_eq!(result[0].phrase, "Hi [1]you[/1][2/]");
        assert!(result[0].warnings().is_empty());
    }

    #[test]
    fn test_unresolved_marker_warning() {
        let result = phrases("<p>x \u{2264} y</p>", TemplateConfig::shared());
        assert_eq!(result[0].phrase, "x \u{2264} y");
        assert_eq!(
            result[0].warnings(),
            vec!["UNRESOLVED MARKER: x \u{2264} y".to_string()]
        );
    }

    #[test]
    fn test_custom_fold_rule_stays_outside_phrases() {
        let mut config = TemplateConfig::default();
        let rule = FoldRule::new(FoldKind::Other("mustache".to_string()), r"\{\{.*?\}\}").unwrap();
        config.fold_rules.insert(0, rule);

        let result = phrases("<p>Hi {{ name }}!</p>", &config);
        let keys: Vec<&str> = result.iter().map(|p| p.phrase.as_str()).collect();
        assert_eq!(keys, vec!["Hi", "!"]);
        assert_eq!(result[0].suffix, " ");
        assert!(result.iter().all(|p| p.attributes.is_empty() && p.warnings().is_empty()));
    }

    #[test]
    fn test_deep_wrapper_chain_passes_through() {
        let depth = 20_000;
        let source = format!("{}Hi{}", "<b>".repeat(depth), "</b>".repeat(depth));
        let config = TemplateConfig::shared();
        let mut tree = build_tree(&source, config).tree;
        for id in 1..tree.len() {
            tree.set_flag(id, Flag::Phrase);
        }
        let segments = assemble_phrases(&tree, config);
        assert_eq!(segments.len(), 2 * depth + 1);
        assert_eq!(segments[0], Segment::Node(1));
        assert_eq!(segments[2 * depth], Segment::Node(tree.len() - 1));
        match &segments[depth] {
            Segment::Phrase(phrase) => assert_eq!(phrase.phrase, "Hi"),
            other => panic!("expected phrase, got {:?}", other),
        }
    }

    #[test]
    fn test_single_wrapper_passes_through() {
        let config = TemplateConfig::shared();
        let mut tree = build_tree("<b><i>Hi</i></b>", config).tree;
        for id in 1..tree.len() {
            tree.set_flag(id, Flag::Phrase);
        }
        let segments = assemble_phrases(&tree, config);
        // <b>, <i>, phrase(Hi), </i>, </b>
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], Segment::Node(1));
        assert_eq!(segments[1], Segment::Node(2));
        match &segments[2] {
            Segment::Phrase(phrase) => {
                assert_eq!(phrase.phrase, "Hi");
                assert!(phrase.attributes.is_empty());
            }
            other => panic!("expected phrase, got {:?}", other),
        }
        assert_eq!(tree.root().children, vec![1, 5]);
        assert_eq!(tree.pair(1), Some(5));
    }
}
