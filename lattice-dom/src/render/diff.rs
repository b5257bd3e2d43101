//! Tree diffing.
//!
//! Nodes are paired by position and classified at each level:
//!
//! 1. Identity differs: the whole subtree is swapped, no recursion.
//! 2. Kind differs: replaced in place, no recursion.
//! 3. Both text: the value is compared.
//! 4. Attributes are compared index by index with strict equality. The
//!    first mismatch replaces the node. Reordering attributes counts as a
//!    change even when the final effect would be the same.
//! 5. Otherwise the children are walked pairwise. Extra new children are
//!    appended, missing ones deleted.
//!
//! Node-level changes precede the changes of that node's children, and
//! children are visited in index order.

use tracing::debug;

use crate::node::{Identity, NodeDescription};

/// Where a node sat in the old tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildPosition {
    /// Identity of the parent description; `None` at the root.
    pub parent: Option<Identity>,
    /// Index among the parent's children.
    pub index: usize,
}

impl ChildPosition {
    pub const ROOT: ChildPosition = ChildPosition {
        parent: None,
        index: 0,
    };

    pub fn child(parent: Identity, index: usize) -> Self {
        Self {
            parent: Some(parent),
            index,
        }
    }
}

/// One edit needed to turn the old display tree into the new one.
#[derive(Debug, Clone)]
pub enum Change {
    /// The node was re-created: swap the element stamped `old` for `node`.
    ReplaceIdentity {
        old: Identity,
        position: ChildPosition,
        node: NodeDescription,
    },
    /// Same identity, different content: rebuild from `node`.
    ReplaceInPlace {
        position: ChildPosition,
        node: NodeDescription,
    },
    /// A text node's value changed. Located through its parent.
    ReplaceText {
        position: ChildPosition,
        value: String,
    },
    /// Append `node` as the last child of `parent`.
    Insert {
        parent: Identity,
        node: NodeDescription,
    },
    /// Remove the display node produced by `node`.
    Delete {
        position: ChildPosition,
        node: NodeDescription,
    },
}

impl Change {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Change::ReplaceIdentity { .. } => "replace-identity",
            Change::ReplaceInPlace { .. } => "replace-in-place",
            Change::ReplaceText { .. } => "replace-text",
            Change::Insert { .. } => "insert",
            Change::Delete { .. } => "delete",
        }
    }
}

/// Compute the ordered changes between two trees.
pub fn diff(old: &NodeDescription, new: &NodeDescription) -> Vec<Change> {
    let mut changes = Vec::new();
    walk(old, new, ChildPosition::ROOT, &mut changes);
    debug!(
        old_root = %old.identity(),
        new_root = %new.identity(),
        changes = changes.len(),
        "diff complete"
    );
    changes
}

fn walk(
    old: &NodeDescription,
    new: &NodeDescription,
    position: ChildPosition,
    changes: &mut Vec<Change>,
) {
    if old.identity() != new.identity() {
        changes.push(Change::ReplaceIdentity {
            old: old.identity(),
            position,
            node: new.clone(),
        });
        return;
    }

    if old.kind() != new.kind() {
        changes.push(Change::ReplaceInPlace {
            position,
            node: new.clone(),
        });
        return;
    }

    if old.is_text() {
        if old.node_value() != new.node_value() {
            changes.push(Change::ReplaceText {
                position,
                value: new.node_value().unwrap_or_default().to_string(),
            });
        }
        return;
    }

    if attributes_differ(old, new) {
        changes.push(Change::ReplaceInPlace {
            position,
            node: new.clone(),
        });
        return;
    }

    walk_children(old, new, changes);
}

fn attributes_differ(old: &NodeDescription, new: &NodeDescription) -> bool {
    let (old_attrs, new_attrs) = (old.attributes(), new.attributes());
    let len = old_attrs.len().max(new_attrs.len());
    (0..len).any(|i| match (old_attrs.get_index(i), new_attrs.get_index(i)) {
        (Some((old_key, old_value)), Some((new_key, new_value))) => {
            old_key != new_key || !old_value.strict_eq(new_value)
        }
        _ => true,
    })
}

fn walk_children(old: &NodeDescription, new: &NodeDescription, changes: &mut Vec<Change>) {
    let parent = new.identity();
    let (old_children, new_children) = (old.children(), new.children());
    let len = old_children.len().max(new_children.len());

    for index in 0..len {
        match (old_children.get(index), new_children.get(index)) {
            (None, Some(added)) => changes.push(Change::Insert {
                parent,
                node: added.clone(),
            }),
            (Some(removed), None) => changes.push(Change::Delete {
                position: ChildPosition::child(parent, index),
                node: removed.clone(),
            }),
            (Some(old_child), Some(new_child)) => walk(
                old_child,
                new_child,
                ChildPosition::child(parent, index),
                changes,
            ),
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Component, EventHandler, Style};

    fn id(raw: u64) -> Identity {
        Identity::from(raw)
    }

    fn el(tag: &str, raw: u64) -> NodeDescription {
        NodeDescription::element(tag).with_identity(id(raw))
    }

    fn text(value: &str, raw: u64) -> NodeDescription {
        NodeDescription::text(value).with_identity(id(raw))
    }

    #[test]
    fn identical_trees_have_no_changes() {
        let tree = el("div", 1)
            .with_attr("class", "x")
            .with_style(Style::new([("color", "red")]))
            .with_child(el("p", 2).with_child(text("hi", 3)));

        assert!(diff(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn text_change_references_parent() {
        let old = el("div", 1).with_child(el("h1", 2).with_child(text("Count: 0", 3)));
        let new = el("div", 1).with_child(el("h1", 2).with_child(text("Count: 1", 3)));

        let changes = diff(&old, &new);

        assert_eq!(changes.len(), 1);
        match &changes[0] {
            Change::ReplaceText { position, value } => {
                assert_eq!(position.parent, Some(id(2)));
                assert_eq!(position.index, 0);
                assert_eq!(value, "Count: 1");
            }
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn identity_change_does_not_recurse() {
        let old = el("ul", 1).with_child(el("li", 2).with_child(text("a", 3)));
        let new = el("ul", 1).with_child(el("li", 9).with_child(text("b", 10)));

        let changes = diff(&old, &new);

        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::ReplaceIdentity { old, node, .. } if *old == id(2) && node.identity() == id(9)
        ));
    }

    #[test]
    fn kind_change_replaces_in_place() {
        let old = el("div", 1).with_child(el("span", 2));
        let new = el("div", 1).with_child(el("em", 2));

        let changes = diff(&old, &new);

        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::ReplaceInPlace { node, .. } if node.tag() == Some("em")
        ));
    }

    #[test]
    fn text_to_element_is_kind_change() {
        let old = el("div", 1).with_child(text("a", 2));
        let new = el("div", 1).with_child(el("b", 2));

        let changes = diff(&old, &new);
        assert!(matches!(&changes[..], [Change::ReplaceInPlace { .. }]));
    }

    #[test]
    fn component_references_compare_by_pointer() {
        let a = Component::new("A", |_| NodeDescription::element("div"));
        let b = Component::new("A", |_| NodeDescription::element("div"));
        let old = NodeDescription::component(&a).with_identity(id(1));
        let same = NodeDescription::component(&a).with_identity(id(1));
        let other = NodeDescription::component(&b).with_identity(id(1));

        assert!(diff(&old, &same).is_empty());
        assert_eq!(diff(&old, &other).len(), 1);
    }

    #[test]
    fn attribute_value_change_replaces_node() {
        let old = el("div", 1).with_attr("class", "a").with_child(text("x", 2));
        let new = el("div", 1).with_attr("class", "b").with_child(text("y", 2));

        let changes = diff(&old, &new);

        // The replacement covers the child, so no text change follows.
        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], Change::ReplaceInPlace { .. }));
    }

    #[test]
    fn extra_attribute_replaces_node() {
        let old = el("input", 1).with_attr("type", "text");
        let new = el("input", 1).with_attr("type", "text").with_attr("disabled", true);

        assert_eq!(diff(&old, &new).len(), 1);
        assert_eq!(diff(&new, &old).len(), 1);
    }

    #[test]
    fn reordered_attributes_count_as_change() {
        let old = el("a", 1).with_attr("href", "/").with_attr("title", "home");
        let new = el("a", 1).with_attr("title", "home").with_attr("href", "/");

        assert_eq!(diff(&old, &new).len(), 1);
    }

    #[test]
    fn fresh_handler_counts_as_change() {
        let handler = EventHandler::new(|_| {});
        let old = el("button", 1).with_handler("click", handler.clone());
        let kept = el("button", 1).with_handler("click", handler);
        let fresh = el("button", 1).on("click", |_| {});

        assert!(diff(&old, &kept).is_empty());
        assert_eq!(diff(&old, &fresh).len(), 1);
    }

    #[test]
    fn appended_child_is_inserted_under_parent() {
        let old = el("ul", 1).with_child(el("li", 2)).with_child(el("li", 3));
        let new = el("ul", 1)
            .with_child(el("li", 2))
            .with_child(el("li", 3))
            .with_child(el("li", 4));

        let changes = diff(&old, &new);

        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::Insert { parent, node } if *parent == id(1) && node.identity() == id(4)
        ));
    }

    #[test]
    fn removed_child_is_deleted() {
        let old = el("ul", 1).with_child(el("li", 2)).with_child(el("li", 3));
        let new = el("ul", 1).with_child(el("li", 2));

        let changes = diff(&old, &new);

        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::Delete { node, position } if node.identity() == id(3) && position.index == 1
        ));
    }

    #[test]
    fn changes_follow_child_order() {
        let old = el("div", 1)
            .with_child(el("p", 2).with_child(text("a", 3)))
            .with_child(el("p", 4).with_child(text("b", 5)));
        let new = el("div", 1)
            .with_child(el("p", 2).with_child(text("A", 3)))
            .with_child(el("p", 4).with_child(text("B", 5)))
            .with_child(el("p", 6));

        let labels: Vec<_> = diff(&old, &new).iter().map(Change::label).collect();
        assert_eq!(labels, vec!["replace-text", "replace-text", "insert"]);
    }

    #[test]
    fn root_identity_change() {
        let changes = diff(&el("div", 1), &el("div", 2));
        assert!(matches!(
            &changes[..],
            [Change::ReplaceIdentity { position: ChildPosition::ROOT, .. }]
        ));
    }
}
