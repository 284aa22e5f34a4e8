//! Lifecycle Driver
//!
//! Starts, stops and destroys a graph of components in dependency order.
//!
//! # How It Works
//!
//! 1. Each payload implements [`Lifecycle`].
//!
//! 2. [`start_all`] walks dependencies before dependents, so a component
//!    starts only after everything it depends on is running.
//!
//! 3. [`stop_all`] and [`destroy_all`] walk dependents first, so nothing is
//!    torn down while something still relies on it.
//!
//! 4. The first failure aborts the phase. Components already handled stay
//!    as they are; the error names the phase and the failing key.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::{DagGraph, Direction, GraphKey};

/// A component that can be started and stopped.
pub trait Lifecycle {
    /// Error reported by a failed transition.
    type Error: StdError + Send + Sync + 'static;

    /// Bring the component up. Its dependencies are already running.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Bring the component down. Its dependents are already stopped.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Release the component's resources.
    fn destroy(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: Lifecycle + ?Sized> Lifecycle for Box<T> {
    type Error = T::Error;

    fn start(&mut self) -> Result<(), Self::Error> {
        (**self).start()
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        (**self).stop()
    }

    fn destroy(&mut self) -> Result<(), Self::Error> {
        (**self).destroy()
    }
}

/// A lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Bring a node up, after everything it depends on.
    Start,
    /// Bring a node down, before everything it depends on.
    Stop,
    /// Release a stopped node.
    Destroy,
}

impl Phase {
    /// The order the phase visits nodes in.
    pub fn direction(self) -> Direction {
        match self {
            Phase::Start => Direction::DependencyFirst,
            Phase::Stop | Phase::Destroy => Direction::DependentFirst,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Start => "start",
            Phase::Stop => "stop",
            Phase::Destroy => "destroy",
        })
    }
}

/// A transition failed on one node.
#[derive(Debug, Error)]
#[error("failed to {phase} node {key:?}")]
pub struct LifecycleError<K: fmt::Debug, E: StdError + 'static> {
    /// The transition that failed.
    pub phase: Phase,

    /// The node whose payload failed.
    pub key: K,

    /// The payload's own error.
    #[source]
    pub source: E,
}

/// Start every node, dependencies first.
pub fn start_all<K, V>(graph: &mut DagGraph<K, V>) -> Result<(), LifecycleError<K, V::Error>>
where
    K: GraphKey,
    V: Lifecycle,
{
    run(graph, Phase::Start)
}

/// Stop every node, dependents first.
pub fn stop_all<K, V>(graph: &mut DagGraph<K, V>) -> Result<(), LifecycleError<K, V::Error>>
where
    K: GraphKey,
    V: Lifecycle,
{
    run(graph, Phase::Stop)
}

/// Destroy every node, dependents first.
pub fn destroy_all<K, V>(graph: &mut DagGraph<K, V>) -> Result<(), LifecycleError<K, V::Error>>
where
    K: GraphKey,
    V: Lifecycle,
{
    run(graph, Phase::Destroy)
}

fn run<K, V>(graph: &mut DagGraph<K, V>, phase: Phase) -> Result<(), LifecycleError<K, V::Error>>
where
    K: GraphKey,
    V: Lifecycle,
{
    debug!(%phase, nodes = graph.size(), "lifecycle phase begins");

    graph.try_walk_mut(phase.direction(), |key, component| {
        let result = match phase {
            Phase::Start => component.start(),
            Phase::Stop => component.stop(),
            Phase::Destroy => component.destroy(),
        };

        result.map_err(|source| {
            warn!(%phase, key = ?key, error = %source, "lifecycle transition failed");
            LifecycleError {
                phase,
                key: key.clone(),
                source,
            }
        })
    })
}
