//! Connected Components
//!
//! Splits the graph into weakly-connected components: edge direction is
//! ignored, so two nodes share a component when any chain of edges links
//! them.
//!
//! Components come back sorted by size, smallest first. Walks schedule
//! small independent subgraphs before large ones, so this ordering is part
//! of the observable walk order. The sort is stable; equal-sized components
//! keep discovery order, which is ascending by smallest key.

use std::collections::{BTreeSet, HashSet};

use smallvec::SmallVec;

use super::node::{GraphKey, NodeMap};

/// Partition every node into its weakly-connected component.
pub(crate) fn connected_components<K: GraphKey, V>(nodes: &NodeMap<K, V>) -> Vec<BTreeSet<K>> {
    let mut visited: HashSet<&K> = HashSet::with_capacity(nodes.len());
    let mut components = Vec::new();

    for start in nodes.keys() {
        if !visited.insert(start) {
            continue;
        }

        // Explicit work stack; component size does not bound recursion depth.
        let mut component = BTreeSet::new();
        let mut stack: SmallVec<[&K; 16]> = SmallVec::new();
        stack.push(start);

        while let Some(key) = stack.pop() {
            component.insert(key.clone());

            let Some(node) = nodes.get(key) else {
                continue;
            };
            for neighbor in node.predecessors().iter().chain(node.successors()) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        components.push(component);
    }

    components.sort_by_key(BTreeSet::len);
    components
}
