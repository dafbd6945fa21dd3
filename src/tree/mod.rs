//! Id-addressed queries and edits over a slide tree.
//!
//! Every function here is pure. Edits return a new root that shares every
//! untouched subtree with the old one: only the ancestors of the edited node
//! are copied. When nothing changes the input root itself comes back, so
//! `Arc::ptr_eq(&old, &new)` is a complete "did anything change" test.
//!
//! Lookups visit nodes in pre-order (parent before children, earlier siblings
//! before later ones) and act on the first match only.

use std::convert::Infallible;
use std::sync::Arc;

use crate::ast::Node;

pub mod patch;

pub use patch::{
    CommonPatch, ContainerPatch, GroupPatch, MutationError, NodePatch, Patch, ShapePatch,
    TextPatch,
};

/// A node located by id, with its position in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Found<'a> {
    pub node: &'a Arc<Node>,
    /// `None` for the root.
    pub parent: Option<&'a Arc<Node>>,
    /// Index among the parent's children; `None` for the root.
    pub index: Option<usize>,
}

/// Result of [`delete_by_id`].
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    Deleted(Arc<Node>),
    NotFound,
    /// The id names the root, which has no parent to remove it from.
    RootNotDeletable,
}

pub fn find_by_id<'a>(root: &'a Arc<Node>, id: &str) -> Option<&'a Arc<Node>> {
    find_with_parent(root, id).map(|found| found.node)
}

pub fn find_with_parent<'a>(root: &'a Arc<Node>, id: &str) -> Option<Found<'a>> {
    if root.id() == Some(id) {
        return Some(Found {
            node: root,
            parent: None,
            index: None,
        });
    }
    find_below(root, id)
}

fn find_below<'a>(parent: &'a Arc<Node>, id: &str) -> Option<Found<'a>> {
    for (index, child) in parent.children()?.iter().enumerate() {
        if child.id() == Some(id) {
            return Some(Found {
                node: child,
                parent: Some(parent),
                index: Some(index),
            });
        }
        if let Some(found) = find_below(child, id) {
            return Some(found);
        }
    }
    None
}

/// Applies `patch` to the first node with `id`. Returns `root` itself when
/// the id is absent or the patch changes nothing.
pub fn update_by_id(
    root: &Arc<Node>,
    id: &str,
    patch: &NodePatch,
) -> Result<Arc<Node>, MutationError> {
    let mut apply = |node: &Arc<Node>| -> Result<Rewrite, MutationError> {
        let patched = patch.apply(node)?;
        if patched == **node {
            Ok(Rewrite::Unchanged)
        } else {
            Ok(Rewrite::Replaced(Arc::new(patched)))
        }
    };
    let outcome = rewrite_first(root, id, &mut apply)?;
    Ok(outcome.into_root(root))
}

/// Swaps the first node with `id`, subtree included, for `replacement`.
pub fn replace_by_id(root: &Arc<Node>, id: &str, replacement: Arc<Node>) -> Arc<Node> {
    let outcome = rewrite_first(root, id, &mut |_: &Arc<Node>| {
        Ok::<_, Infallible>(Rewrite::Replaced(Arc::clone(&replacement)))
    });
    match outcome {
        Ok(outcome) => outcome.into_root(root),
        Err(never) => match never {},
    }
}

/// Removes the first node with `id` from its parent.
pub fn delete_by_id(root: &Arc<Node>, id: &str) -> DeleteOutcome {
    if root.id() == Some(id) {
        return DeleteOutcome::RootNotDeletable;
    }
    match rewrite_first(root, id, &mut |_: &Arc<Node>| {
        Ok::<_, Infallible>(Rewrite::Removed)
    }) {
        Ok(Rewrite::Replaced(new_root)) => DeleteOutcome::Deleted(new_root),
        Ok(_) => DeleteOutcome::NotFound,
        Err(never) => match never {},
    }
}

/// Every id in the tree, pre-order.
pub fn collect_ids(root: &Arc<Node>) -> Vec<String> {
    let mut ids = Vec::new();
    collect_into(root, &mut ids);
    ids
}

fn collect_into(node: &Node, ids: &mut Vec<String>) {
    if let Some(id) = node.id() {
        ids.push(id.to_string());
    }
    for child in node.children().into_iter().flatten() {
        collect_into(child, ids);
    }
}

enum Rewrite {
    NotFound,
    Unchanged,
    Replaced(Arc<Node>),
    Removed,
}

impl Rewrite {
    fn into_root(self, root: &Arc<Node>) -> Arc<Node> {
        match self {
            Rewrite::Replaced(new_root) => new_root,
            _ => Arc::clone(root),
        }
    }
}

// Finds the first node with `id`, lets `edit` decide its fate and rebuilds
// the ancestors on the way back up.
fn rewrite_first<E>(
    node: &Arc<Node>,
    id: &str,
    edit: &mut impl FnMut(&Arc<Node>) -> Result<Rewrite, E>,
) -> Result<Rewrite, E> {
    if node.id() == Some(id) {
        return edit(node);
    }
    let Some(children) = node.children() else {
        return Ok(Rewrite::NotFound);
    };
    for (index, child) in children.iter().enumerate() {
        let outcome = match rewrite_first(child, id, edit)? {
            Rewrite::NotFound => continue,
            Rewrite::Unchanged => return Ok(Rewrite::Unchanged),
            outcome => outcome,
        };
        let mut parent = Node::clone(node);
        if let Some(siblings) = parent.children_mut() {
            match outcome {
                Rewrite::Replaced(new_child) => {
                    siblings.set(index, new_child);
                }
                Rewrite::Removed => {
                    siblings.remove(index);
                }
                Rewrite::NotFound | Rewrite::Unchanged => {}
            }
        }
        return Ok(Rewrite::Replaced(Arc::new(parent)));
    }
    Ok(Rewrite::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ContainerNode, TextNode};
    use im::Vector;

    fn text(id: &str, content: &str) -> Arc<Node> {
        Arc::new(Node::Text(TextNode::plain(content)).with_id(id))
    }

    fn frame(id: &str, children: Vec<Arc<Node>>) -> Arc<Node> {
        Arc::new(
            Node::Container(ContainerNode {
                children: Vector::from(children),
                ..ContainerNode::default()
            })
            .with_id(id),
        )
    }

    #[test]
    fn first_match_wins_in_pre_order() {
        let root = frame(
            "root",
            vec![frame("a", vec![text("dup", "deep")]), text("dup", "shallow")],
        );
        assert_eq!(find_by_id(&root, "dup").and_then(|n| n.text()), Some("deep"));
    }

    #[test]
    fn untouched_siblings_keep_identity() {
        let left = frame("left", vec![text("l1", "x")]);
        let right = frame("right", vec![text("r1", "y")]);
        let root = frame("root", vec![Arc::clone(&left), Arc::clone(&right)]);

        let new_root = replace_by_id(&root, "r1", text("r1", "z"));
        let children = new_root.children().unwrap();
        assert!(Arc::ptr_eq(&children[0], &left));
        assert!(!Arc::ptr_eq(&children[1], &right));
        assert!(!Arc::ptr_eq(&new_root, &root));
    }

    #[test]
    fn ids_come_back_in_pre_order() {
        let root = frame("r", vec![frame("a", vec![text("b", "")]), text("c", "")]);
        assert_eq!(collect_ids(&root), ["r", "a", "b", "c"]);
    }
}
