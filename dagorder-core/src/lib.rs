//! dagorder Core
//!
//! This crate provides a dependency-graph ordering engine. It implements:
//!
//! - A keyed node store that creates nodes on first access
//! - Cycle-checked edge insertion
//! - Deterministic start (dependency-first) and stop (dependent-first) orders
//! - An interactive frontier protocol that hands out ready keys one step at
//!   a time
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Node store, cycle guard, component decomposition, sequencing
//!   and the frontier protocol
//! - `lifecycle`: Start/stop/destroy drivers for graphs of components
//! - `manifest`: JSON description of a graph's structure
//!
//! # Example
//!
//! ```rust
//! use dagorder_core::graph::{DagGraph, Direction};
//!
//! let mut graph: DagGraph<u32, &str> = DagGraph::new();
//! *graph.value_of(0) = "storage";
//! *graph.value_of(1) = "index";
//! *graph.value_of(2) = "server";
//! assert!(graph.add_edge(0, 1));
//! assert!(graph.add_edge(1, 2));
//!
//! let mut stop_order = Vec::new();
//! graph.walk(Direction::DependentFirst, |_, name| stop_order.push(*name));
//! assert_eq!(stop_order, vec!["server", "index", "storage"]);
//!
//! // Or step through the start order interactively.
//! let ready = graph.begin_frontier();
//! assert_eq!(ready.into_iter().collect::<Vec<_>>(), vec![0]);
//! assert_eq!(graph.advance(&0).into_iter().collect::<Vec<_>>(), vec![1]);
//! ```

pub mod graph;
pub mod lifecycle;
pub mod manifest;

pub use graph::{DagGraph, Direction, GraphError, GraphKey, Mode};
pub use lifecycle::{Lifecycle, LifecycleError, Phase};
pub use manifest::{EdgeSpec, GraphManifest, ManifestError, ManifestReport};
