//! Graph Manifest
//!
//! A declarative description of a graph's structure: which nodes exist and
//! which edges connect them. Manifests are the configuration format for
//! building a graph from a file, and the export format for inspecting one.
//!
//! ```json
//! {
//!   "nodes": ["db", "cache", "api"],
//!   "edges": [
//!     {"from": "db", "to": "api"},
//!     {"from": "cache", "to": "api"}
//!   ]
//! }
//! ```
//!
//! Payloads are not part of a manifest. Nodes created from one start with
//! `V::default()`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::{DagGraph, GraphError, GraphKey};

/// Errors that can occur while reading or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is not valid JSON or does not match the manifest shape.
    #[error("invalid graph manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// One directed edge: `to` depends on `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec<K> {
    /// The dependency.
    pub from: K,
    /// The dependent.
    pub to: K,
}

/// Nodes and edges of a graph, without payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct GraphManifest<K> {
    /// Keys to create.
    #[serde(default)]
    pub nodes: Vec<K>,

    /// Edges to add, in order.
    #[serde(default)]
    pub edges: Vec<EdgeSpec<K>>,
}

impl<K> Default for GraphManifest<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// Outcome of applying a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport<K: std::fmt::Debug> {
    /// Edges that were accepted.
    pub added: usize,

    /// Edges that were rejected, in manifest order.
    pub rejected: Vec<GraphError<K>>,
}

impl<K: std::fmt::Debug> ManifestReport<K> {
    /// True when every edge was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl<K> GraphManifest<K> {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    pub fn node(mut self, key: K) -> Self {
        self.nodes.push(key);
        self
    }

    /// Add an edge `from -> to`.
    pub fn edge(mut self, from: K, to: K) -> Self {
        self.edges.push(EdgeSpec { from, to });
        self
    }
}

impl<K: DeserializeOwned> GraphManifest<K> {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K: Serialize> GraphManifest<K> {
    /// Render the manifest as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<K: GraphKey> GraphManifest<K> {
    /// Create the listed nodes in `graph`, then add the listed edges.
    ///
    /// Rejected edges are collected rather than aborting, so one bad edge
    /// does not hide the rest. An edge endpoint missing from `nodes` is
    /// rejected as unknown.
    ///
    /// # Panics
    ///
    /// Panics if a listed node has to be created while `graph` is frozen.
    pub fn apply<V: Default>(&self, graph: &mut DagGraph<K, V>) -> ManifestReport<K> {
        for key in &self.nodes {
            graph.value_of(key.clone());
        }

        let mut report = ManifestReport {
            added: 0,
            rejected: Vec::new(),
        };
        for edge in &self.edges {
            match graph.try_add_edge(edge.from.clone(), edge.to.clone()) {
                Ok(()) => report.added += 1,
                Err(err) => {
                    warn!(error = %err, "manifest edge rejected");
                    report.rejected.push(err);
                }
            }
        }

        debug!(
            nodes = self.nodes.len(),
            added = report.added,
            rejected = report.rejected.len(),
            "manifest applied"
        );
        report
    }

    /// Build a fresh graph from the manifest.
    pub fn build<V: Default>(&self) -> (DagGraph<K, V>, ManifestReport<K>) {
        let mut graph = DagGraph::new();
        let report = self.apply(&mut graph);
        (graph, report)
    }
}

impl<K: GraphKey, V> DagGraph<K, V> {
    /// Export the current structure: nodes ascending, edges ascending by
    /// `(from, to)`.
    pub fn manifest(&self) -> GraphManifest<K> {
        let mut manifest = GraphManifest::new();
        for node in self.nodes() {
            manifest.nodes.push(node.key().clone());
            for to in node.successors() {
                manifest.edges.push(EdgeSpec {
                    from: node.key().clone(),
                    to: to.clone(),
                });
            }
        }
        manifest
    }
}
