//! ML (Markup Language) Parser Module
//!
//! Tokenizes folded template source and builds the document tree

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod tags;
pub mod tokens;

pub use ast::{Flag, Node, NodeId, NodeKind, TagData, Tree, ROOT_ID};
pub use lexer::{tokenize, Lexer};
pub use parser::{build_content_nodes, build_tree, ContentPiece, ParseTreeResult};
pub use tags::{Closing, I18nAttr, INLINE_TAGS, SELF_CLOSING_TAGS};
pub use tokens::{Token, TokenType};
