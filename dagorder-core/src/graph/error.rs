//! Error types for graph mutation
//!
//! Only edge insertion can fail in a recoverable way. Protocol misuse
//! (mutating a frozen graph through `add_edge`, advancing a key outside the
//! frontier) is a programming error and panics instead.

use std::fmt::Debug;

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T, K> = Result<T, GraphError<K>>;

/// Why an edge was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError<K: Debug> {
    /// The edge would point a node at itself.
    #[error("node {key:?} cannot depend on itself")]
    SelfLoop {
        /// The node on both ends of the edge
        key: K,
    },

    /// An endpoint has never been created.
    #[error("node {key:?} does not exist")]
    UnknownKey {
        /// The missing endpoint
        key: K,
    },

    /// `to` already reaches `from`, so the edge would close a cycle.
    #[error("edge {from:?} -> {to:?} would create a cycle")]
    WouldCycle {
        /// Source of the rejected edge
        from: K,
        /// Target of the rejected edge
        to: K,
    },

    /// A frontier session holds the graph frozen.
    #[error("graph is frozen by an active frontier session")]
    Frozen,
}

impl<K: Debug> GraphError<K> {
    /// Creates a self-loop error
    pub fn self_loop(key: K) -> Self {
        Self::SelfLoop { key }
    }

    /// Creates an unknown key error
    pub fn unknown_key(key: K) -> Self {
        Self::UnknownKey { key }
    }

    /// Creates a cycle error for the edge `from -> to`
    pub fn would_cycle(from: K, to: K) -> Self {
        Self::WouldCycle { from, to }
    }
}
