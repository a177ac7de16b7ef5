//! Flag propagation
//!
//! Labels every node `Ignore`, `Phrase` or `Candidate`. The first pass runs
//! children before parents and lets decisions bubble up through inline
//! wrappers; the second runs parents before children and settles every
//! candidate from its surroundings.

use crate::ml_parser::ast::{Flag, NodeId, NodeKind, Tree, ROOT_ID};
use crate::ml_parser::tags::{Closing, I18nAttr};
use crate::util::has_visible_text;

pub fn propagate_flags(tree: &mut Tree) {
    flag_postorder(tree);
    resolve_preorder(tree);
}

/// Children before parents, siblings in document order
fn flag_postorder(tree: &mut Tree) {
    let mut stack: Vec<(NodeId, bool)> = vec![(ROOT_ID, false)];
    while let Some((id, visited)) = stack.pop() {
        let children = &tree[id].children;
        if visited {
            let flag = initial_flag(tree, id, children);
            tree.set_flag(id, flag);
            continue;
        }
        stack.push((id, true));
        stack.extend(children.iter().rev().map(|&child| (child, false)));
    }
}

fn initial_flag(tree: &Tree, id: NodeId, children: &[NodeId]) -> Flag {
    let node = &tree[id];
    match &node.kind {
        NodeKind::Root => Flag::Ignore,
        NodeKind::Tag(tag) => match tag.closing {
            Closing::Close => tag.pair.map(|pair| tree.flag(pair)).unwrap_or(Flag::Ignore),
            _ => match node.i18n_attr {
                Some(I18nAttr::Ignore) | Some(I18nAttr::New) => Flag::Ignore,
                Some(I18nAttr::Sub) => Flag::Phrase,
                None if !tag.inline => Flag::Ignore,
                None if tag.closing == Closing::SelfClose => Flag::Candidate,
                None => {
                    if children.iter().any(|&child| tree.flag(child) == Flag::Ignore) {
                        Flag::Ignore
                    } else {
                        Flag::Candidate
                    }
                }
            },
        },
        NodeKind::Fold { kind, .. } => {
            if kind.is_output() {
                Flag::Candidate
            } else {
                Flag::Ignore
            }
        }
        NodeKind::Text => {
            let after_block_open = tree
                .preceding(id)
                .and_then(|prev| prev.fold_kind())
                .map_or(false, |kind| kind.is_block_open());
            if node.i18n_attr == Some(I18nAttr::Ignore) || after_block_open {
                Flag::Ignore
            } else if has_visible_text(&node.content) {
                Flag::Phrase
            } else {
                Flag::Candidate
            }
        }
    }
}

/// Parents before children; a subtree is settled before its next sibling
fn resolve_preorder(tree: &mut Tree) {
    let mut stack: Vec<NodeId> = vec![ROOT_ID];
    while let Some(id) = stack.pop() {
        if tree.flag(id) == Flag::Candidate {
            resolve_candidate(tree, id);
        }
        stack.extend(tree[id].children.iter().rev());
    }
}

fn resolve_candidate(tree: &mut Tree, id: NodeId) {
    let is_phrase = |other: Option<NodeId>| other.map_or(false, |n| tree.flag(n) == Flag::Phrase);

    if is_phrase(tree[id].parent)
        || is_phrase(tree.prev_sibling(id))
        || is_phrase(tree.next_sibling(id))
    {
        tree.set_flag(id, Flag::Phrase);
        return;
    }

    let children = tree[id].children.clone();
    let open_children = children.iter().filter(|&&c| tree[c].is_open_tag()).count();
    tree.set_flag(id, Flag::Ignore);
    if open_children > 1 {
        for child in children {
            tree.set_flag(child, Flag::Phrase);
        }
    }
}
