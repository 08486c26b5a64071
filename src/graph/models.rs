//! Data structures for the relationship tree

use serde::Serialize;

use super::object::ObjectRecord;

/// Position of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hierarchy {
    /// The object the graph was requested for
    Root,
    /// Owner, selector or router of the parent (e.g. the Service of a Pod)
    Upper,
    /// Dependent of the parent (e.g. the Pods of a ReplicaSet)
    Lower,
}

/// A node in the relationship tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub object: ObjectRecord,
    pub hierarchy: Hierarchy,
    /// Related objects, upper ones first, each group in discovery order
    pub children: Vec<GraphNode>,
}

impl GraphNode {
    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(GraphNode::node_count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(GraphNode::depth).max().unwrap_or(0)
    }
}
