//! Deciding whether a node is the array value of a named property.
//!
//! JSON has no notion of a named array: the name lives on the enclosing
//! property, whose children are the key string and the value. The check is
//! therefore one hop up from the array, never a walk over all ancestors.

use jsonc_tree::{Node, NodeKind};
use tracing::trace;

/// Property holding the task list in `tasks.json`.
pub const TASKS_PROPERTY: &str = "tasks";

/// Matches nodes that are the array value of a property with a given key.
///
/// The key comparison is exact: case sensitive, no trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextClassifier {
    property: &'static str,
}

impl ContextClassifier {
    /// Matches the array of `"tasks": [...]`.
    pub const TASKS: ContextClassifier = ContextClassifier::for_property(TASKS_PROPERTY);

    pub const fn for_property(property: &'static str) -> Self {
        Self { property }
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Whether `node` (the node enclosing the cursor) is an array owned by
    /// this classifier's property. No node means no match.
    pub fn matches(&self, node: Option<Node<'_>>) -> bool {
        let Some(node) = node else {
            return false;
        };
        let matched = is_in_array(node) && parent_has_string_child(node, self.property);
        trace!(
            property = self.property,
            kind = node.kind().type_name(),
            matched,
            "classified node"
        );
        matched
    }
}

/// Whether `node` is inside the array of a `"tasks"` property.
pub fn is_in_tasks_array(node: Option<Node<'_>>) -> bool {
    ContextClassifier::TASKS.matches(node)
}

pub fn is_in_array(node: Node<'_>) -> bool {
    matches!(node.kind(), NodeKind::Array)
}

pub fn is_parent_tasks(node: Node<'_>) -> bool {
    parent_has_string_child(node, TASKS_PROPERTY)
}

/// Whether the parent of `node` is a property with a string child equal to
/// `value`. For a property value that child is the key.
pub fn parent_has_string_child(node: Node<'_>, value: &str) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if !matches!(parent.kind(), NodeKind::Property { .. }) {
        return false;
    }
    parent.children().any(|child| child.as_str() == Some(value))
}
