//! Property-based tests for the ordering engine
//!
//! Tests invariants that should hold for ALL edge sequences:
//! - Acyclicity: an edge is refused exactly when it would close a cycle
//! - Partition: components cover every key exactly once, smallest first
//! - Validity: both walk directions respect every accepted edge
//! - Coherence: walks after a mutation see the new structure
//! - Endpoints: heads and tails are exactly the keys with no incoming or outgoing edges
//! - Drain: the frontier hands out every key once, after its predecessors

use std::collections::{BTreeMap, BTreeSet, HashMap};

use dagorder_core::{DagGraph, Direction};
use proptest::prelude::*;

const KEYS: u8 = 24;

/// Build a graph over `0..KEYS` and return it with the accepted edges.
fn build(edges: &[(u8, u8)]) -> (DagGraph<u8, ()>, Vec<(u8, u8)>) {
    let mut graph = DagGraph::new();
    for key in 0..KEYS {
        graph.value_of(key);
    }
    let accepted = edges
        .iter()
        .copied()
        .filter(|&(from, to)| graph.add_edge(from, to))
        .collect();
    (graph, accepted)
}

/// Forward reachability over an explicit edge list.
fn reaches(edges: &[(u8, u8)], from: u8, to: u8) -> bool {
    let mut adjacency: BTreeMap<u8, Vec<u8>> = BTreeMap::new();
    for &(a, b) in edges {
        adjacency.entry(a).or_default().push(b);
    }
    let mut stack = vec![from];
    let mut seen = BTreeSet::new();
    while let Some(key) = stack.pop() {
        if key == to {
            return true;
        }
        if seen.insert(key) {
            stack.extend(adjacency.get(&key).into_iter().flatten().copied());
        }
    }
    false
}

fn positions(graph: &mut DagGraph<u8, ()>, direction: Direction) -> HashMap<u8, usize> {
    let mut order = Vec::new();
    graph.walk(direction, |key, _| order.push(*key));
    order.into_iter().enumerate().map(|(i, key)| (key, i)).collect()
}

fn edge_list() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0..KEYS, 0..KEYS), 0..80)
}

proptest! {
    #[test]
    fn prop_rejects_exactly_the_cycle_closing_edges(edges in edge_list()) {
        let mut graph: DagGraph<u8, ()> = DagGraph::new();
        for key in 0..KEYS {
            graph.value_of(key);
        }
        let mut accepted: Vec<(u8, u8)> = Vec::new();

        for (from, to) in edges {
            let closes = from == to || reaches(&accepted, to, from);
            let before = graph.manifest();
            let added = graph.add_edge(from, to);

            prop_assert_eq!(added, !closes);
            if added {
                if !accepted.contains(&(from, to)) {
                    accepted.push((from, to));
                }
            } else {
                prop_assert_eq!(graph.manifest(), before);
            }
        }
    }

    #[test]
    fn prop_components_partition_keys(edges in edge_list()) {
        let (graph, _) = build(&edges);
        let components = graph.components();

        let total: usize = components.iter().map(BTreeSet::len).sum();
        prop_assert_eq!(total, graph.size());

        let union: BTreeSet<u8> = components.iter().flatten().copied().collect();
        prop_assert_eq!(union.len(), graph.size());

        for pair in components.windows(2) {
            prop_assert!(pair[0].len() <= pair[1].len());
        }
    }

    #[test]
    fn prop_walks_respect_every_edge(edges in edge_list()) {
        let (mut graph, accepted) = build(&edges);
        let down = positions(&mut graph, Direction::DependencyFirst);
        let up = positions(&mut graph, Direction::DependentFirst);

        prop_assert_eq!(down.len(), graph.size());
        prop_assert_eq!(up.len(), graph.size());
        for (from, to) in accepted {
            prop_assert!(down[&from] < down[&to]);
            prop_assert!(up[&from] > up[&to]);
        }
    }

    #[test]
    fn prop_walk_sees_later_edges(first in edge_list(), second in edge_list()) {
        let (mut graph, _) = build(&first);
        positions(&mut graph, Direction::DependencyFirst);

        for (from, to) in second {
            if graph.add_edge(from, to) {
                let down = positions(&mut graph, Direction::DependencyFirst);
                prop_assert!(down[&from] < down[&to]);
            }
        }
    }

    #[test]
    fn prop_heads_and_tails_match_edge_sets(edges in edge_list()) {
        let (graph, _) = build(&edges);

        let heads: BTreeSet<u8> = (0..KEYS)
            .filter(|key| graph.predecessors(key).is_some_and(BTreeSet::is_empty))
            .collect();
        let tails: BTreeSet<u8> = (0..KEYS)
            .filter(|key| graph.successors(key).is_some_and(BTreeSet::is_empty))
            .collect();

        prop_assert_eq!(graph.heads(), &heads);
        prop_assert_eq!(graph.tails(), &tails);
    }

    #[test]
    fn prop_frontier_drains_every_key_once(edges in edge_list()) {
        let (mut graph, _) = build(&edges);
        let mut ready = graph.begin_frontier();
        prop_assert_eq!(&ready, graph.heads());

        let mut consumed = BTreeSet::new();
        while let Some(key) = ready.pop_first() {
            let predecessors = graph.predecessors(&key).cloned().unwrap_or_default();
            prop_assert!(predecessors.is_subset(&consumed));
            prop_assert!(consumed.insert(key));

            for next in graph.advance(&key) {
                prop_assert!(!consumed.contains(&next));
                prop_assert!(ready.insert(next));
            }
        }

        prop_assert_eq!(consumed.len(), graph.size());
        prop_assert!(graph.is_drained());
    }
}
