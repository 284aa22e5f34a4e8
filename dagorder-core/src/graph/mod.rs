//! Dependency Graph
//!
//! This module implements the ordering engine: a keyed store of payloads,
//! directed dependency edges between them, and the orders in which the
//! payloads can be started and stopped.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes are created on first access by key and own an opaque payload
//! - An edge `a -> b` means `b` depends on `a`: `a` starts first, stops last
//!
//! Edge insertion is checked up front; an edge that would close a cycle is
//! rejected and nothing changes. Every accepted structure therefore has a
//! complete topological order.
//!
//! # Ordering
//!
//! Orders are computed per weakly-connected component. Components are
//! visited smallest first, and within a component Kahn's algorithm orders
//! the keys, breaking ties by ascending key. Both directions are computed
//! together and cached until the next structural change.
//!
//! # Design Decisions
//!
//! 1. Nodes refer to each other by key, through the owning map. There are
//!    no inter-node references to dangle.
//!
//! 2. The store is a `BTreeMap`, so every scan over keys is ascending and
//!    every order is reproducible.
//!
//! 3. The frontier protocol freezes the structure explicitly through
//!    [`Mode`], so the orders it was started from stay valid.

mod cache;
mod components;
mod dag;
mod error;
mod frontier;
mod node;
mod sequencer;

pub use dag::DagGraph;
pub use error::{GraphError, GraphResult};
pub use frontier::Mode;
pub use node::{Direction, GraphKey, Node};
