//! Frontier Stepper
//!
//! An interactive alternative to the batch walkers. A caller opens a
//! session, receives the keys that have no dependencies, and then reports
//! each key it has finished with; every report returns the keys that just
//! became ready. Driving every returned key to completion consumes each
//! node exactly once.
//!
//! # States
//!
//! - `Open`: the graph accepts structural mutation. No session is active.
//! - `Frozen`: a session is active. Edges and nodes can no longer be added
//!   until the graph is cleared, which is the only way back to `Open`.
//!
//! The session keeps a private copy of the dependency-first sequences. A
//! consumed key leaves its component's copy, and a successor is ready once
//! none of its predecessors remain there.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use tracing::{debug, trace};

use super::node::{GraphKey, NodeMap};

/// Whether the graph accepts structural mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// No frontier session; edges and nodes may be added.
    #[default]
    Open,

    /// A frontier session is active; the structure is fixed.
    Frozen,
}

/// Session state for the frontier protocol.
#[derive(Debug, Clone)]
pub(crate) struct Frontier<K> {
    mode: Mode,

    /// Unconsumed keys per component, in dependency-first order.
    working: Vec<IndexSet<K>>,

    /// Keys handed out and not yet consumed.
    ready: BTreeSet<K>,
}

impl<K> Default for Frontier<K> {
    fn default() -> Self {
        Self {
            mode: Mode::Open,
            working: Vec::new(),
            ready: BTreeSet::new(),
        }
    }
}

impl<K: GraphKey> Frontier<K> {
    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn ready(&self) -> &BTreeSet<K> {
        &self.ready
    }

    /// True once a session has consumed every key.
    pub(crate) fn is_drained(&self) -> bool {
        self.mode == Mode::Frozen
            && self.ready.is_empty()
            && self.working.iter().all(IndexSet::is_empty)
    }

    /// Enter `Frozen` with `heads` as the initial frontier.
    ///
    /// # Panics
    ///
    /// Panics if a session is already active.
    pub(crate) fn freeze(&mut self, sequences: &[Vec<K>], heads: &BTreeSet<K>) {
        assert_eq!(
            self.mode,
            Mode::Open,
            "frontier session already started; clear the graph before starting another"
        );

        self.mode = Mode::Frozen;
        self.working = sequences
            .iter()
            .map(|sequence| sequence.iter().cloned().collect())
            .collect();
        self.ready = heads.clone();

        debug!(
            components = self.working.len(),
            ready = self.ready.len(),
            "frontier session started"
        );
    }

    /// Consume `key` and return the keys it unblocked.
    ///
    /// # Panics
    ///
    /// Panics if no session is active or `key` is not in the frontier.
    pub(crate) fn advance<V>(&mut self, key: &K, nodes: &NodeMap<K, V>) -> BTreeSet<K> {
        assert_eq!(
            self.mode,
            Mode::Frozen,
            "advance requires an active frontier session"
        );
        let was_ready = self.ready.remove(key);
        assert!(was_ready, "key {key:?} is not in the current frontier");

        let mut unblocked = BTreeSet::new();

        // A key lives in exactly one component; the first match is the only one.
        let Some(remaining) = self.working.iter_mut().find(|c| c.contains(key)) else {
            return unblocked;
        };
        remaining.shift_remove(key);

        if let Some(node) = nodes.get(key) {
            for successor in node.successors() {
                let released = nodes.get(successor).is_some_and(|next| {
                    next.predecessors().iter().all(|p| !remaining.contains(p))
                });
                if released {
                    unblocked.insert(successor.clone());
                }
            }
        }

        self.ready.extend(unblocked.iter().cloned());
        trace!(key = ?key, unblocked = unblocked.len(), "frontier advanced");
        unblocked
    }

    /// Drop the session and return to `Open`.
    pub(crate) fn reset(&mut self) {
        self.mode = Mode::Open;
        self.working.clear();
        self.ready.clear();
    }
}
