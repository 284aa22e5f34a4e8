//! Topological Sequencer
//!
//! Orders one connected component so that every edge is respected in the
//! chosen direction.
//!
//! # Algorithm
//!
//! Kahn's algorithm with a FIFO ready queue:
//!
//! 1. Count, for each key, the edges arriving under the direction
//! 2. Seed the queue with every zero-in-degree key, ascending
//! 3. Pop a key, append it, and decrement its neighbors (ascending);
//!    a neighbor reaching zero joins the back of the queue
//! 4. Stop when the queue empties
//!
//! Ascending order for both the seed and the neighbor visit makes the
//! output a pure function of the graph structure.

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::node::{Direction, GraphKey, NodeMap};

/// Compute a topological order of `component` under `direction`.
///
/// # Panics
///
/// Panics if the order does not cover the whole component. Edge insertion
/// rejects cycles, so a short order means the store itself is corrupt.
pub(crate) fn topological_sequence<K: GraphKey, V>(
    nodes: &NodeMap<K, V>,
    component: &BTreeSet<K>,
    direction: Direction,
) -> Vec<K> {
    let mut in_degree: HashMap<&K, usize> = HashMap::with_capacity(component.len());
    let mut queue: VecDeque<&K> = VecDeque::new();

    for key in component {
        let degree = nodes
            .get(key)
            .map_or(0, |node| node.incoming(direction).len());
        in_degree.insert(key, degree);
        if degree == 0 {
            queue.push_back(key);
        }
    }

    let mut sequence = Vec::with_capacity(component.len());
    while let Some(key) = queue.pop_front() {
        sequence.push(key.clone());

        let Some(node) = nodes.get(key) else {
            continue;
        };
        for next in node.outgoing(direction) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    assert_eq!(
        sequence.len(),
        component.len(),
        "topological sequence does not cover its component; the graph contains a cycle"
    );
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Node;

    /// Build a raw store, bypassing the cycle guard.
    fn store(edges: &[(u32, u32)], keys: &[u32]) -> NodeMap<u32, ()> {
        let mut nodes: NodeMap<u32, ()> = keys.iter().map(|&k| (k, Node::new(k, ()))).collect();
        for &(from, to) in edges {
            nodes.get_mut(&from).unwrap().add_successor(to);
            nodes.get_mut(&to).unwrap().add_predecessor(from);
        }
        nodes
    }

    fn all(keys: &[u32]) -> BTreeSet<u32> {
        keys.iter().copied().collect()
    }

    #[test]
    fn chain_in_both_directions() {
        let nodes = store(&[(0, 1), (1, 2)], &[0, 1, 2]);
        let component = all(&[0, 1, 2]);
        assert_eq!(
            topological_sequence(&nodes, &component, Direction::DependencyFirst),
            vec![0, 1, 2]
        );
        assert_eq!(
            topological_sequence(&nodes, &component, Direction::DependentFirst),
            vec![2, 1, 0]
        );
    }

    #[test]
    fn diamond_breaks_ties_by_key() {
        //    0
        //   / \
        //  1   3
        //  | x |
        //  2   4
        //   \ /
        //    5
        let edges = [(0, 1), (0, 3), (1, 2), (3, 4), (1, 4), (3, 2), (2, 5), (4, 5)];
        let nodes = store(&edges, &[0, 1, 2, 3, 4, 5]);
        let component = all(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(
            topological_sequence(&nodes, &component, Direction::DependencyFirst),
            vec![0, 1, 3, 2, 4, 5]
        );
        assert_eq!(
            topological_sequence(&nodes, &component, Direction::DependentFirst),
            vec![5, 2, 4, 1, 3, 0]
        );
    }

    #[test]
    fn multiple_roots_seed_ascending() {
        let nodes = store(&[(11, 12), (12, 9), (8, 9), (9, 10)], &[8, 9, 10, 11, 12]);
        let component = all(&[8, 9, 10, 11, 12]);
        assert_eq!(
            topological_sequence(&nodes, &component, Direction::DependencyFirst),
            vec![8, 11, 12, 9, 10]
        );
        assert_eq!(
            topological_sequence(&nodes, &component, Direction::DependentFirst),
            vec![10, 9, 8, 12, 11]
        );
    }

    #[test]
    #[should_panic(expected = "does not cover its component")]
    fn corrupted_store_is_fatal() {
        let nodes = store(&[(0, 1), (1, 0)], &[0, 1]);
        topological_sequence(&nodes, &all(&[0, 1]), Direction::DependencyFirst);
    }
}
