// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::Result;
use crate::spec::{DependencyExpr, parse_dependency_map};
use crate::types::{DependencyMap, TaskName};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Direct dependencies: bare names this task waits on.
    deps: BTreeSet<TaskName>,
    /// Direct dependents: tasks that wait on this one.
    dependents: BTreeSet<TaskName>,
}

/// In-memory dependency graph keyed by task name.
///
/// Edges point from dependency to dependent. Keywords and `+`/`_` suffixes are
/// stripped, so only bare task names appear here. A name that is referenced
/// but never declared still gets a node, with no dependencies of its own.
///
/// The graph may contain cycles; [`DagGraph::topological_order`] reports them.
#[derive(Debug, Clone, Default)]
pub struct DagGraph {
    nodes: BTreeMap<TaskName, DagNode>,
}

impl DagGraph {
    /// Parse every expression of `deps` and build the graph.
    pub fn from_dependencies(deps: &DependencyMap) -> Result<Self> {
        let parsed = parse_dependency_map(deps)?;
        Ok(Self::from_parsed(&parsed))
    }

    /// Build the graph from already parsed expressions.
    pub fn from_parsed(parsed: &BTreeMap<TaskName, DependencyExpr>) -> Self {
        let mut nodes: BTreeMap<TaskName, DagNode> = BTreeMap::new();

        // First pass: a node for every declared task, with its dependency set.
        for (name, expr) in parsed {
            let node = nodes.entry(name.clone()).or_default();
            node.deps
                .extend(expr.task_names().map(|dep| dep.to_string()));
        }

        // Second pass: implicit roots and the reverse edges.
        let edges: Vec<(TaskName, TaskName)> = nodes
            .iter()
            .flat_map(|(name, node)| {
                node.deps
                    .iter()
                    .map(move |dep| (dep.clone(), name.clone()))
            })
            .collect();

        for (dep, dependent) in edges {
            nodes.entry(dep).or_default().dependents.insert(dependent);
        }

        Self { nodes }
    }

    /// All task names, in lexical order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(name)
            .into_iter()
            .flat_map(|n| n.deps.iter().map(|s| s.as_str()))
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(name)
            .into_iter()
            .flat_map(|n| n.dependents.iter().map(|s| s.as_str()))
    }

    /// All `(dependency, dependent)` edges.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(|(name, node)| {
            node.deps
                .iter()
                .map(move |dep| (dep.as_str(), name.as_str()))
        })
    }
}
