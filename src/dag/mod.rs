// src/dag/mod.rs

//! Dependency graph and ordering.
//!
//! - [`graph`] holds the adjacency information between bare task names.
//! - [`order`] computes the deterministic submission order and reports cycles.

pub mod graph;
pub mod order;

pub use graph::DagGraph;

use crate::errors::Result;
use crate::types::{DependencyMap, TaskName};

/// Submission order for a dependency map.
pub fn task_ordering(deps: &DependencyMap) -> Result<Vec<TaskName>> {
    DagGraph::from_dependencies(deps)?.topological_order()
}

/// `true` if every expression parses and the graph has no cycle.
pub fn is_valid(deps: &DependencyMap) -> bool {
    task_ordering(deps).is_ok()
}
