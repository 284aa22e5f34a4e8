//! Dependency Graph
//!
//! [`DagGraph`] owns every node, guards edge insertion against cycles, and
//! serves the ordered walks and the frontier protocol from a lazily
//! refreshed sequence cache.

use std::collections::btree_map::Entry;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::convert::Infallible;

use tracing::{debug, trace};

use super::cache::SequenceCache;
use super::components::connected_components;
use super::error::{GraphError, GraphResult};
use super::frontier::{Frontier, Mode};
use super::node::{Direction, GraphKey, Node, NodeMap};

/// Which nodes a walk reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    All,
    Heads,
    Tails,
}

/// A directed acyclic graph of keyed payloads.
///
/// # Example
///
/// ```
/// use dagorder_core::graph::{DagGraph, Direction};
///
/// let mut graph: DagGraph<&str, u32> = DagGraph::new();
/// *graph.value_of("db") = 1;
/// *graph.value_of("api") = 2;
/// assert!(graph.add_edge("db", "api"));
/// assert!(!graph.add_edge("api", "db")); // would close a cycle
///
/// let mut started = Vec::new();
/// graph.walk(Direction::DependencyFirst, |key, _| started.push(*key));
/// assert_eq!(started, vec!["db", "api"]);
/// ```
#[derive(Debug, Clone)]
pub struct DagGraph<K, V> {
    /// All nodes, indexed by key.
    nodes: NodeMap<K, V>,

    /// Keys with no predecessors.
    heads: BTreeSet<K>,

    /// Keys with no successors.
    tails: BTreeSet<K>,

    /// Walk orders; dropped on every structural mutation.
    cache: SequenceCache<K>,

    /// Frontier session state and the Open/Frozen mode.
    frontier: Frontier<K>,
}

impl<K, V> Default for DagGraph<K, V> {
    fn default() -> Self {
        Self {
            nodes: NodeMap::new(),
            heads: BTreeSet::new(),
            tails: BTreeSet::new(),
            cache: SequenceCache::default(),
            frontier: Frontier::default(),
        }
    }
}

impl<K: GraphKey, V> DagGraph<K, V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Node store
    // ------------------------------------------------------------------

    /// Get the payload for `key`, creating the node if it does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the node has to be created while a frontier session holds
    /// the graph frozen. Existing nodes are always accessible.
    pub fn value_of(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry_or_create(key, V::default).value_mut()
    }

    /// Set the payload for `key`, creating the node if needed.
    ///
    /// Returns the previous payload when the node already existed. Edges are
    /// untouched either way.
    ///
    /// # Panics
    ///
    /// Panics under the same condition as [`value_of`](Self::value_of).
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(node) = self.nodes.get_mut(&key) {
            return Some(node.replace_value(value));
        }
        self.entry_or_create(key, || value);
        None
    }

    fn entry_or_create(&mut self, key: K, make: impl FnOnce() -> V) -> &mut Node<K, V> {
        match self.nodes.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                assert_eq!(
                    self.frontier.mode(),
                    Mode::Open,
                    "cannot create node {:?} while a frontier session holds the graph frozen",
                    entry.key()
                );
                let key = entry.key().clone();
                trace!(key = ?key, "node created");

                self.heads.insert(key.clone());
                self.tails.insert(key.clone());
                self.cache.invalidate();
                entry.insert(Node::new(key, make()))
            }
        }
    }

    /// Get the payload for `key` without creating anything.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.nodes.get(key).map(Node::value)
    }

    /// Get the payload for `key` mutably without creating anything.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.nodes.get_mut(key).map(Node::value_mut)
    }

    /// Check whether a node exists.
    pub fn exists(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    /// Get the total number of nodes in the graph.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys with no predecessors.
    pub fn heads(&self) -> &BTreeSet<K> {
        &self.heads
    }

    /// Keys with no successors.
    pub fn tails(&self) -> &BTreeSet<K> {
        &self.tails
    }

    /// Keys `key` depends on, or `None` if the node does not exist.
    pub fn predecessors(&self, key: &K) -> Option<&BTreeSet<K>> {
        self.nodes.get(key).map(Node::predecessors)
    }

    /// Keys that depend on `key`, or `None` if the node does not exist.
    pub fn successors(&self, key: &K) -> Option<&BTreeSet<K>> {
        self.nodes.get(key).map(Node::successors)
    }

    /// Iterate over all nodes in ascending key order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<K, V>> {
        self.nodes.values()
    }

    /// Remove every node, edge and cached order, and end any frontier
    /// session.
    pub fn clear(&mut self) {
        debug!(nodes = self.nodes.len(), "graph cleared");
        self.nodes.clear();
        self.heads.clear();
        self.tails.clear();
        self.cache.invalidate();
        self.frontier.reset();
    }

    // ------------------------------------------------------------------
    // Edge registrar
    // ------------------------------------------------------------------

    /// Add the edge `from -> to`: `to` depends on `from`.
    ///
    /// Returns `false` without changing anything if the edge is a self-loop,
    /// an endpoint does not exist, or the edge would close a cycle. Use
    /// [`try_add_edge`](Self::try_add_edge) to learn which.
    ///
    /// # Panics
    ///
    /// Panics while a frontier session holds the graph frozen.
    pub fn add_edge(&mut self, from: K, to: K) -> bool {
        match self.try_add_edge(from, to) {
            Ok(()) => true,
            Err(GraphError::Frozen) => {
                panic!("cannot add edges while a frontier session holds the graph frozen")
            }
            Err(_) => false,
        }
    }

    /// Add the edge `from -> to`, reporting why it was rejected.
    ///
    /// Adding an edge that already exists succeeds and changes nothing.
    pub fn try_add_edge(&mut self, from: K, to: K) -> GraphResult<(), K> {
        if self.frontier.mode() == Mode::Frozen {
            return Err(GraphError::Frozen);
        }
        if from == to {
            debug!(key = ?from, "rejected self-loop");
            return Err(GraphError::self_loop(from));
        }
        for key in [&from, &to] {
            if !self.nodes.contains_key(key) {
                debug!(key = ?key, "rejected edge to unknown node");
                return Err(GraphError::unknown_key(key.clone()));
            }
        }
        if self.closes_cycle(&from, &to) {
            debug!(from = ?from, to = ?to, "rejected edge that would close a cycle");
            return Err(GraphError::would_cycle(from, to));
        }

        if let Some(node) = self.nodes.get_mut(&from) {
            node.add_successor(to.clone());
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.add_predecessor(from.clone());
        }
        self.heads.remove(&to);
        self.tails.remove(&from);
        self.cache.invalidate();

        trace!(from = ?from, to = ?to, "edge added");
        Ok(())
    }

    /// True if `to` already reaches `from`, found by walking predecessor
    /// edges backwards from `from`.
    fn closes_cycle(&self, from: &K, to: &K) -> bool {
        let mut queue: VecDeque<&K> = self
            .nodes
            .get(from)
            .map(|node| node.predecessors().iter().collect())
            .unwrap_or_default();
        let mut visited: HashSet<&K> = HashSet::new();

        while let Some(key) = queue.pop_front() {
            if key == to {
                return true;
            }
            if !visited.insert(key) {
                continue;
            }
            if let Some(node) = self.nodes.get(key) {
                queue.extend(node.predecessors());
            }
        }

        false
    }

    // ------------------------------------------------------------------
    // Orders and walkers
    // ------------------------------------------------------------------

    /// Weakly-connected components, smallest first.
    ///
    /// Always computed from the current structure; the cache is not used.
    pub fn components(&self) -> Vec<BTreeSet<K>> {
        connected_components(&self.nodes)
    }

    /// Per-component orders for `direction`, smallest component first.
    pub fn sequences(&mut self, direction: Direction) -> &[Vec<K>] {
        self.cache.get_or_refresh(&self.nodes).get(direction)
    }

    /// Visit every node in `direction` order.
    pub fn walk<F>(&mut self, direction: Direction, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        infallible(self.visit(direction, Filter::All, |key, value| {
            f(key, value);
            Ok(())
        }));
    }

    /// Visit every node in `direction` order with mutable access to the
    /// payload.
    pub fn walk_mut<F>(&mut self, direction: Direction, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        infallible(self.visit(direction, Filter::All, |key, value| {
            f(key, value);
            Ok(())
        }));
    }

    /// Visit every node in `direction` order, stopping at the first error.
    ///
    /// Nodes visited before the failure are not revisited or rolled back.
    pub fn try_walk<E, F>(&mut self, direction: Direction, mut f: F) -> Result<(), E>
    where
        F: FnMut(&K, &V) -> Result<(), E>,
    {
        self.visit(direction, Filter::All, |key, value| f(key, value))
    }

    /// Mutable counterpart of [`try_walk`](Self::try_walk).
    pub fn try_walk_mut<E, F>(&mut self, direction: Direction, f: F) -> Result<(), E>
    where
        F: FnMut(&K, &mut V) -> Result<(), E>,
    {
        self.visit(direction, Filter::All, f)
    }

    /// Visit the nodes with no predecessors, in dependency-first order.
    pub fn walk_heads<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        infallible(self.visit(Direction::DependencyFirst, Filter::Heads, |key, value| {
            f(key, value);
            Ok(())
        }));
    }

    /// Visit the nodes with no successors, in dependent-first order.
    pub fn walk_tails<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        infallible(self.visit(Direction::DependentFirst, Filter::Tails, |key, value| {
            f(key, value);
            Ok(())
        }));
    }

    fn visit<E, F>(&mut self, direction: Direction, filter: Filter, mut f: F) -> Result<(), E>
    where
        F: FnMut(&K, &mut V) -> Result<(), E>,
    {
        let sequences = self.cache.get_or_refresh(&self.nodes);

        for key in sequences.get(direction).iter().flatten() {
            let selected = match filter {
                Filter::All => true,
                Filter::Heads => self.heads.contains(key),
                Filter::Tails => self.tails.contains(key),
            };
            if !selected {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(key) {
                f(key, node.value_mut())?;
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Frontier protocol
    // ------------------------------------------------------------------

    /// Freeze the graph and return the keys with no dependencies.
    ///
    /// # Panics
    ///
    /// Panics if a session is already active; call [`clear`](Self::clear)
    /// first.
    pub fn begin_frontier(&mut self) -> BTreeSet<K> {
        let sequences = self.cache.get_or_refresh(&self.nodes);
        self.frontier
            .freeze(sequences.get(Direction::DependencyFirst), &self.heads);
        self.heads.clone()
    }

    /// Mark `key` as finished and return the keys that just became ready.
    ///
    /// # Panics
    ///
    /// Panics if no session is active or `key` is not in the current
    /// frontier.
    pub fn advance(&mut self, key: &K) -> BTreeSet<K> {
        self.frontier.advance(key, &self.nodes)
    }

    /// Current Open/Frozen mode.
    pub fn mode(&self) -> Mode {
        self.frontier.mode()
    }

    /// Keys handed out by the frontier and not yet advanced.
    pub fn frontier(&self) -> &BTreeSet<K> {
        self.frontier.ready()
    }

    /// True once an active session has advanced every key.
    pub fn is_drained(&self) -> bool {
        self.frontier.is_drained()
    }
}

fn infallible(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}
