//! ML Parser
//!
//! Tree builder: turns the token stream of folded source into a node tree.
//! Building stops at the first close tag that does not match the innermost open
//! tag; open tags left at the end of input are accepted.

use log::debug;

use super::ast::*;
use super::lexer::Lexer;
use super::tags::{is_self_closing_syntax, Closing, I18nAttr};
use super::tokens::{Token, TokenType};
use crate::config::TemplateConfig;
use crate::error::TemplateError;
use crate::i18n::fold::{FoldKind, FOLD_TOKEN_PATTERN};
use crate::parse_util::ParseLocation;

/// Parse tree result
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub tree: Tree,
    /// The structural error that stopped the build, if any
    pub error: Option<TemplateError>,
}

impl ParseTreeResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Build the node tree of already folded `source`
pub fn build_tree(source: &str, config: &TemplateConfig) -> ParseTreeResult {
    let mut builder = TreeBuilder::new(config);
    builder.build(Lexer::new(source));
    ParseTreeResult {
        tree: builder.tree,
        error: builder.error,
    }
}

/// Content split into text and fold pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPiece<'a> {
    Text(&'a str),
    Fold {
        token: &'a str,
        index: usize,
        kind: FoldKind,
    },
}

/// Split opaque content at fold placeholders
///
/// Every non-empty gap becomes a text piece; placeholders directly next to each
/// other produce no text between them.
pub fn build_content_nodes(content: &str) -> Vec<ContentPiece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in FOLD_TOKEN_PATTERN.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let Ok(index) = caps[1].parse() else { continue };
        if whole.start() > last {
            pieces.push(ContentPiece::Text(&content[last..whole.start()]));
        }
        pieces.push(ContentPiece::Fold {
            token: whole.as_str(),
            index,
            kind: FoldKind::from_name(&caps[2]),
        });
        last = whole.end();
    }
    if last < content.len() {
        pieces.push(ContentPiece::Text(&content[last..]));
    }
    pieces
}

struct TreeBuilder<'c> {
    config: &'c TemplateConfig,
    tree: Tree,
    stack: Vec<NodeId>,
    error: Option<TemplateError>,
}

impl<'c> TreeBuilder<'c> {
    fn new(config: &'c TemplateConfig) -> Self {
        TreeBuilder {
            config,
            tree: Tree::new(),
            stack: vec![ROOT_ID],
            error: None,
        }
    }

    fn build(&mut self, tokens: impl Iterator<Item = Token>) {
        for token in tokens {
            match token.token_type.clone() {
                TokenType::TagOpen(name) => self.consume_start_tag(token, name),
                TokenType::TagClose(name) => self.consume_end_tag(token, name),
                TokenType::Content => self.consume_content(token),
            }
            if self.error.is_some() {
                return;
            }
        }

        if self.stack.len() > 1 {
            debug!("{} tag(s) left open at end of input", self.stack.len() - 1);
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(ROOT_ID)
    }

    fn consume_start_tag(&mut self, token: Token, name: String) {
        let closing = if is_self_closing_syntax(&token.text) || self.config.is_self_closing(&name)
        {
            Closing::SelfClose
        } else {
            Closing::Open
        };
        let inline = self.config.is_inline(&name);
        let i18n_attr = self
            .config
            .i18n_attr_pattern
            .captures(&token.text)
            .and_then(|caps| I18nAttr::from_code(&caps[1]));

        let mut node = Node::new(
            NodeKind::Tag(TagData {
                name,
                closing,
                pair: None,
                inline,
            }),
            token.text,
            token.location,
        );
        node.i18n_attr = i18n_attr;

        let id = self.add_to_parent(node);
        if closing == Closing::Open {
            self.stack.push(id);
        }
    }

    fn consume_end_tag(&mut self, token: Token, name: String) {
        let current = self.current();
        let open_name = match self.tree[current].tag() {
            Some(tag) => tag.name.clone(),
            None => {
                self.error = Some(TemplateError::ExtraCloseTag {
                    name,
                    line: token.location.line,
                });
                return;
            }
        };
        if open_name != name {
            self.error = Some(TemplateError::TagMismatch {
                open: open_name,
                close: name,
                line: token.location.line,
            });
            return;
        }

        self.stack.pop();
        let mut node = Node::new(
            NodeKind::Tag(TagData {
                name,
                closing: Closing::Close,
                pair: None,
                inline: self.config.is_inline(&open_name),
            }),
            token.text,
            token.location,
        );
        node.i18n_attr = self.tree[current].i18n_attr;

        let parent = self.current();
        let id = self.tree.add_child(parent, node);
        self.tree.link_pair(current, id);
    }

    fn consume_content(&mut self, token: Token) {
        let mut offset = token.location.offset;
        let mut line = token.location.line;
        for piece in build_content_nodes(&token.text) {
            let (kind, text) = match piece {
                ContentPiece::Text(text) => (NodeKind::Text, text),
                ContentPiece::Fold { token, index, kind } => (NodeKind::Fold { index, kind }, token),
            };
            let node = Node::new(kind, text.to_string(), ParseLocation::new(offset, line));
            self.add_to_parent(node);
            offset += text.len();
            line += text.matches('\n').count();
        }
    }

    fn add_to_parent(&mut self, mut node: Node) -> NodeId {
        let parent = self.current();
        node.inherit_i18n_attr(self.tree[parent].i18n_attr);
        self.tree.add_child(parent, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fold::fold_token;

    fn build(source: &str) -> ParseTreeResult {
        build_tree(source, TemplateConfig::shared())
    }

    #[test]
    fn test_build_nested() {
        let result = build("<div>Hello <b>world</b></div>");
        assert!(result.is_ok());
        let tree = &result.tree;
        // root, div, Hello, b, world, /b, /div
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.root().children, vec![1, 6]);
        assert_eq!(tree[1].children, vec![2, 3, 5]);
        assert_eq!(tree.pair(1), Some(6));
        assert_eq!(tree.pair(5), Some(3));
        assert!(tree[6].is_close_tag());
    }

    #[test]
    fn test_self_closing() {
        let result = build("<div>a<br>b<hr/>c</div>");
        let tree = &result.tree;
        assert!(tree[3].is_self_close());
        assert!(tree[5].is_self_close());
        assert_eq!(tree[1].children.len(), 5);
    }

    #[test]
    fn test_tag_mismatch() {
        let result = build("<div><span></div>");
        assert_eq!(
            result.error,
            Some(TemplateError::TagMismatch {
                open: "span".to_string(),
                close: "div".to_string(),
                line: 1,
            })
        );
    }

    #[test]
    fn test_extra_close_tag() {
        let result = build("<div>\n</div>\n</div>");
        assert_eq!(
            result.error,
            Some(TemplateError::ExtraCloseTag {
                name: "div".to_string(),
                line: 3,
            })
        );
    }

    #[test]
    fn test_unclosed_at_end() {
        let result = build("<div>\n  <p>\n");
        assert!(result.is_ok());
        assert_eq!(result.tree.pair(1), None);
    }

    #[test]
    fn test_ignore_attr_inherited() {
        let result = build("<div data-i18n=\"i\">Hello<span data-i18n=\"n\">World</span><b>x</b></div>");
        let tree = &result.tree;
        assert_eq!(tree[2].i18n_attr, Some(I18nAttr::Ignore));
        assert_eq!(tree[3].i18n_attr, Some(I18nAttr::New));
        assert_eq!(tree[4].i18n_attr, None);
        assert_eq!(tree[5].i18n_attr, Some(I18nAttr::New));
        assert_eq!(tree[6].i18n_attr, Some(I18nAttr::Ignore));
    }

    #[test]
    fn test_content_nodes_with_folds() {
        let fold0 = fold_token(0, &FoldKind::ErbCode);
        let fold1 = fold_token(1, &FoldKind::ErbExpression);
        let content = format!("{}TEXT{} {}", fold0, fold1, fold0);
        let pieces = build_content_nodes(&content);
        assert_eq!(pieces.len(), 5);
        assert_eq!(pieces[1], ContentPiece::Text("TEXT"));
        assert_eq!(
            pieces[2],
            ContentPiece::Fold {
                token: fold1.as_str(),
                index: 1,
                kind: FoldKind::ErbExpression
            }
        );
        assert_eq!(pieces[3], ContentPiece::Text(" "));
    }

    #[test]
    fn test_content_node_lines() {
        let folded = format!("<p>a\nb{}c</p>", fold_token(0, &FoldKind::ErbExpression));
        let result = build(&folded);
        let tree = &result.tree;
        assert_eq!(tree[2].location.line, 1);
        assert_eq!(tree[3].location.line, 2);
        assert_eq!(tree[4].content, "c");
    }
}
