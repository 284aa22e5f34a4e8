//! Sequence Cache
//!
//! Memoizes the component decomposition and both directional orders.
//! The cache is either absent (stale) or holds a complete, consistent pair
//! of sequences; any structural mutation drops both at once, and the next
//! read recomputes both.

use tracing::debug;

use super::components::connected_components;
use super::node::{Direction, GraphKey, NodeMap};
use super::sequencer::topological_sequence;

/// Ordered keys for every component, in both directions.
///
/// Components appear smallest first; index `i` of each direction refers to
/// the same component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sequences<K> {
    dependency_first: Vec<Vec<K>>,
    dependent_first: Vec<Vec<K>>,
}

impl<K: GraphKey> Sequences<K> {
    /// Decompose and order the whole store.
    fn compute<V>(nodes: &NodeMap<K, V>) -> Self {
        let components = connected_components(nodes);
        let mut dependency_first = Vec::with_capacity(components.len());
        let mut dependent_first = Vec::with_capacity(components.len());

        for component in &components {
            dependency_first.push(topological_sequence(
                nodes,
                component,
                Direction::DependencyFirst,
            ));
            dependent_first.push(topological_sequence(
                nodes,
                component,
                Direction::DependentFirst,
            ));
        }

        debug!(
            nodes = nodes.len(),
            components = components.len(),
            "walk sequences refreshed"
        );

        Self {
            dependency_first,
            dependent_first,
        }
    }

    /// Per-component orders for `direction`.
    pub(crate) fn get(&self, direction: Direction) -> &[Vec<K>] {
        match direction {
            Direction::DependencyFirst => &self.dependency_first,
            Direction::DependentFirst => &self.dependent_first,
        }
    }
}

/// Lazily refreshed holder for [`Sequences`].
#[derive(Debug, Clone)]
pub(crate) struct SequenceCache<K> {
    sequences: Option<Sequences<K>>,
}

impl<K> Default for SequenceCache<K> {
    fn default() -> Self {
        Self { sequences: None }
    }
}

impl<K: GraphKey> SequenceCache<K> {
    /// Drop both directions.
    pub(crate) fn invalidate(&mut self) {
        self.sequences = None;
    }

    /// Return the cached sequences, recomputing them first if stale.
    pub(crate) fn get_or_refresh<V>(&mut self, nodes: &NodeMap<K, V>) -> &Sequences<K> {
        self.sequences
            .get_or_insert_with(|| Sequences::compute(nodes))
    }
}
