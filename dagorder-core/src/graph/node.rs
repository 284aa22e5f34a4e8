//! Graph Nodes
//!
//! This module defines the node type stored in the dependency graph and the
//! traversal direction used by every ordering operation.
//!
//! Nodes record their edges by key. The predecessor and successor sets are
//! lookups through the owning graph, never references to other nodes, so a
//! node can be moved or cloned freely.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Bounds every node identity must satisfy.
///
/// Keys are totally ordered (ordering drives every deterministic tie-break),
/// hashable (working sets), cloneable (keys are copied into edge sets) and
/// debuggable (they appear in log events and error messages).
pub trait GraphKey: Ord + Hash + Clone + Debug {}

impl<T> GraphKey for T where T: Ord + Hash + Clone + Debug {}

/// The owning store: every node of a graph, indexed by key.
pub(crate) type NodeMap<K, V> = BTreeMap<K, Node<K, V>>;

/// Which way a traversal follows the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Dependencies before dependents: follow successor edges.
    /// This is the start order.
    #[default]
    DependencyFirst,

    /// Dependents before dependencies: follow predecessor edges.
    /// This is the stop order.
    DependentFirst,
}

impl Direction {
    /// The opposite traversal direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::DependencyFirst => Direction::DependentFirst,
            Direction::DependentFirst => Direction::DependencyFirst,
        }
    }
}

/// A node in the dependency graph.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    /// Identity of this node.
    key: K,

    /// Payload owned by the node. The graph never looks inside it.
    value: V,

    /// Keys with an edge into this node (what this node depends on).
    predecessors: BTreeSet<K>,

    /// Keys this node has an edge into (what depends on this node).
    successors: BTreeSet<K>,
}

impl<K: Ord, V> Node<K, V> {
    /// Create a node with no edges.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            predecessors: BTreeSet::new(),
            successors: BTreeSet::new(),
        }
    }

    /// Get the node's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Get the node's payload.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Get the node's payload mutably.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replace the payload, returning the previous one.
    pub fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    /// Keys this node depends on.
    pub fn predecessors(&self) -> &BTreeSet<K> {
        &self.predecessors
    }

    /// Keys that depend on this node.
    pub fn successors(&self) -> &BTreeSet<K> {
        &self.successors
    }

    /// True when nothing points into this node.
    pub fn is_head(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// True when this node points at nothing.
    pub fn is_tail(&self) -> bool {
        self.successors.is_empty()
    }

    /// Neighbors reached by following edges in `direction`.
    pub fn outgoing(&self, direction: Direction) -> &BTreeSet<K> {
        match direction {
            Direction::DependencyFirst => &self.successors,
            Direction::DependentFirst => &self.predecessors,
        }
    }

    /// Neighbors whose edges arrive at this node under `direction`.
    pub fn incoming(&self, direction: Direction) -> &BTreeSet<K> {
        self.outgoing(direction.reverse())
    }

    /// Record an edge `key -> self`. Returns false if it was already present.
    pub(crate) fn add_predecessor(&mut self, key: K) -> bool {
        self.predecessors.insert(key)
    }

    /// Record an edge `self -> key`. Returns false if it was already present.
    pub(crate) fn add_successor(&mut self, key: K) -> bool {
        self.successors.insert(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_head_and_tail() {
        let node = Node::new(7, "payload");
        assert_eq!(*node.key(), 7);
        assert_eq!(*node.value(), "payload");
        assert!(node.is_head());
        assert!(node.is_tail());
    }

    #[test]
    fn edge_sets_deduplicate() {
        let mut node = Node::new(1, ());
        assert!(node.add_successor(2));
        assert!(!node.add_successor(2));
        assert!(node.add_predecessor(0));

        assert_eq!(node.successors().len(), 1);
        assert_eq!(node.predecessors().len(), 1);
        assert!(!node.is_head());
        assert!(!node.is_tail());
    }

    #[test]
    fn direction_selects_edge_set() {
        let mut node = Node::new(1, ());
        node.add_predecessor(0);
        node.add_successor(2);
        node.add_successor(3);

        let down: Vec<_> = node.outgoing(Direction::DependencyFirst).iter().copied().collect();
        assert_eq!(down, vec![2, 3]);

        let up: Vec<_> = node.outgoing(Direction::DependentFirst).iter().copied().collect();
        assert_eq!(up, vec![0]);

        assert_eq!(node.incoming(Direction::DependencyFirst).len(), 1);
        assert_eq!(node.incoming(Direction::DependentFirst).len(), 2);
    }

    #[test]
    fn replace_value_returns_previous() {
        let mut node = Node::new("a", 1);
        assert_eq!(node.replace_value(2), 1);
        *node.value_mut() += 1;
        assert_eq!(*node.value(), 3);
    }

    #[test]
    fn direction_reverse_round_trips() {
        assert_eq!(Direction::DependencyFirst.reverse(), Direction::DependentFirst);
        assert_eq!(Direction::DependentFirst.reverse(), Direction::DependencyFirst);
        assert_eq!(Direction::default(), Direction::DependencyFirst);
    }
}
