//! ML Parser AST
//!
//! The document tree lives in an arena. Node ids are arena indices, assigned in
//! document order, so walking the arena front to back visits every token of the
//! folded source exactly once. The root always has id 0.
//!
//! A close tag is stored as a sibling of its open tag (a child of the open tag's
//! parent); both sides point at each other through `pair`.

use serde::{Deserialize, Serialize};

use super::tags::{Closing, I18nAttr};
use crate::i18n::fold::FoldKind;
use crate::parse_util::ParseLocation;

pub type NodeId = usize;

pub const ROOT_ID: NodeId = 0;

/// Translatability decided by flag propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flag {
    #[default]
    Unset,
    Ignore,
    Phrase,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagData {
    /// Lower-cased tag name
    pub name: String,
    pub closing: Closing,
    pub pair: Option<NodeId>,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Tag(TagData),
    Text,
    Fold { index: usize, kind: FoldKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Source text of the node (tag markup, literal text or a fold placeholder)
    pub content: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Position inside the parent's `children`
    pub index_in_parent: usize,
    pub flag: Flag,
    pub i18n_attr: Option<I18nAttr>,
    pub location: ParseLocation,
}

impl Node {
    pub fn new(kind: NodeKind, content: String, location: ParseLocation) -> Self {
        Node {
            kind,
            content,
            children: Vec::new(),
            parent: None,
            index_in_parent: 0,
            flag: Flag::Unset,
            i18n_attr: None,
            location,
        }
    }

    pub fn tag(&self) -> Option<&TagData> {
        match &self.kind {
            NodeKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    pub fn is_fold(&self) -> bool {
        matches!(self.kind, NodeKind::Fold { .. })
    }

    pub fn fold_kind(&self) -> Option<&FoldKind> {
        match &self.kind {
            NodeKind::Fold { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn closing(&self) -> Option<Closing> {
        self.tag().map(|tag| tag.closing)
    }

    pub fn is_open_tag(&self) -> bool {
        self.closing() == Some(Closing::Open)
    }

    pub fn is_close_tag(&self) -> bool {
        self.closing() == Some(Closing::Close)
    }

    pub fn is_self_close(&self) -> bool {
        self.closing() == Some(Closing::SelfClose)
    }

    /// Take the `i` attribute from `other` when this node has none of its own
    pub fn inherit_i18n_attr(&mut self, other: Option<I18nAttr>) {
        if self.i18n_attr.is_none() && other == Some(I18nAttr::Ignore) {
            self.i18n_attr = other;
        }
    }
}

/// Arena of document nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let mut root = Node::new(NodeKind::Root, String::new(), ParseLocation::new(0, 1));
        root.flag = Flag::Ignore;
        Tree { nodes: vec![root] }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT_ID]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Append `node` as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        node.index_in_parent = self.nodes[parent].children.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Link an open tag and its close tag both ways
    pub fn link_pair(&mut self, open: NodeId, close: NodeId) {
        for (id, other) in [(open, close), (close, open)] {
            if let NodeKind::Tag(tag) = &mut self.nodes[id].kind {
                tag.pair = Some(other);
            }
        }
    }

    pub fn flag(&self, id: NodeId) -> Flag {
        self.nodes[id].flag
    }

    pub fn set_flag(&mut self, id: NodeId, flag: Flag) {
        self.nodes[id].flag = flag;
    }

    pub fn pair(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].tag().and_then(|tag| tag.pair)
    }

    fn raw_prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        let parent = &self.nodes[node.parent?];
        node.index_in_parent
            .checked_sub(1)
            .map(|index| parent.children[index])
    }

    fn raw_next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        let parent = &self.nodes[node.parent?];
        parent.children.get(node.index_in_parent + 1).copied()
    }

    /// Previous sibling; a tag looks past its own pair
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let sibling = self.raw_prev_sibling(id)?;
        match self.pair(id) {
            Some(pair) if pair == sibling => self.prev_sibling(pair),
            _ => Some(sibling),
        }
    }

    /// Next sibling; a tag looks past its own pair
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let sibling = self.raw_next_sibling(id)?;
        match self.pair(id) {
            Some(pair) if pair == sibling => self.next_sibling(pair),
            _ => Some(sibling),
        }
    }

    /// The node directly before `id` in its parent, pairs not skipped
    pub fn preceding(&self, id: NodeId) -> Option<&Node> {
        self.raw_prev_sibling(id).map(|sibling| &self.nodes[sibling])
    }

    /// Text of the single-child chain below `id`, if the chain ends in a text node
    ///
    /// `<span><b>text</b></span>` yields `text`; any branching yields `None`.
    pub fn wrapped_text(&self, id: NodeId) -> Option<&str> {
        let mut current = id;
        loop {
            let children = self.element_children(current);
            if children.len() != 1 {
                return None;
            }
            current = children[0];
            if self.nodes[current].is_text() {
                return Some(&self.nodes[current].content);
            }
        }
    }

    /// Children of `id` without close tags
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|&child| !self.nodes[child].is_close_tag())
            .collect()
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, closing: Closing) -> Node {
        Node::new(
            NodeKind::Tag(TagData {
                name: name.to_string(),
                closing,
                pair: None,
                inline: true,
            }),
            format!("<{}>", name),
            ParseLocation::new(0, 1),
        )
    }

    fn text(content: &str) -> Node {
        Node::new(NodeKind::Text, content.to_string(), ParseLocation::new(0, 1))
    }

    #[test]
    fn test_root_is_ignored() {
        let tree = Tree::new();
        assert_eq!(tree.root().flag, Flag::Ignore);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_siblings_skip_pair() {
        // Hello <b>x</b> world
        let mut tree = Tree::new();
        let hello = tree.add_child(ROOT_ID, text("Hello "));
        let open = tree.add_child(ROOT_ID, tag("b", Closing::Open));
        let inner = tree.add_child(open, text("x"));
        let close = tree.add_child(ROOT_ID, tag("b", Closing::Close));
        tree.link_pair(open, close);
        let world = tree.add_child(ROOT_ID, text(" world"));

        assert_eq!(tree.next_sibling(open), Some(world));
        assert_eq!(tree.prev_sibling(close), Some(hello));
        assert_eq!(tree.next_sibling(hello), Some(open));
        assert_eq!(tree.prev_sibling(world), Some(close));
        assert_eq!(tree.prev_sibling(inner), None);
        assert_eq!(tree.next_sibling(inner), None);
    }

    #[test]
    fn test_wrapped_text() {
        let mut tree = Tree::new();
        let span = tree.add_child(ROOT_ID, tag("span", Closing::Open));
        let b = tree.add_child(span, tag("b", Closing::Open));
        tree.add_child(b, text("text"));
        let b_close = tree.add_child(span, tag("b", Closing::Close));
        tree.link_pair(b, b_close);

        assert_eq!(tree.wrapped_text(span), Some("text"));

        tree.add_child(span, text("more"));
        assert_eq!(tree.wrapped_text(span), None);
    }

    #[test]
    fn test_inherit_only_ignore() {
        let mut node = text("x");
        node.inherit_i18n_attr(Some(I18nAttr::New));
        assert_eq!(node.i18n_attr, None);
        node.inherit_i18n_attr(Some(I18nAttr::Ignore));
        assert_eq!(node.i18n_attr, Some(I18nAttr::Ignore));
    }
}
