// src/dag/order.rs

//! Deterministic topological ordering of a [`DagGraph`].

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::graph::DagGraph;
use crate::errors::{Result, SlurmdagError};
use crate::types::TaskName;

impl DagGraph {
    /// Compute a submission order where every dependency comes before its
    /// dependents.
    ///
    /// Kahn's algorithm with a sorted ready set: whenever several tasks are
    /// ready at once, the lexically smallest goes first. The result depends
    /// only on the graph, never on input iteration order.
    pub fn topological_order(&self) -> Result<Vec<TaskName>> {
        let mut in_degree: BTreeMap<&str, usize> = self
            .tasks()
            .map(|name| (name, self.dependencies_of(name).count()))
            .collect();

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(name) = ready.pop_first() {
            order.push(name.to_string());
            for dependent in self.dependents_of(name) {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() < self.len() {
            let blocked: BTreeSet<&str> = in_degree
                .into_iter()
                .filter(|(_, deg)| *deg > 0)
                .map(|(name, _)| name)
                .collect();
            return Err(self.cycle_error(&blocked));
        }

        debug!(?order, "computed topological order");
        Ok(order)
    }

    /// Build a `DagCycle` error naming the tasks of one cycle among the
    /// `blocked` tasks (those Kahn's pass could not release).
    fn cycle_error(&self, blocked: &BTreeSet<&str>) -> SlurmdagError {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for &name in blocked {
            graph.add_node(name);
        }
        for (dep, dependent) in self.edges() {
            if blocked.contains(dep) && blocked.contains(dependent) {
                graph.add_edge(dep, dependent, ());
            }
        }

        let mut cycles: Vec<Vec<&str>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();
        cycles.sort();

        let members = cycles
            .first()
            .map(|scc| scc.as_slice())
            .unwrap_or_default();
        let listed = members
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");

        SlurmdagError::DagCycle(format!(
            "cycle detected in task DAG involving task(s) {listed}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::DependencyMap;

    fn deps(pairs: &[(&str, &str)]) -> DependencyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn order_of(pairs: &[(&str, &str)]) -> Result<Vec<TaskName>> {
        DagGraph::from_dependencies(&deps(pairs))?.topological_order()
    }

    #[test]
    fn simple_chain() {
        let order = order_of(&[("A", ""), ("B", "after:A"), ("C", "afterany:A:B")]).unwrap();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn implicit_root_comes_first() {
        assert_eq!(order_of(&[("X", "after:Y")]).unwrap(), vec!["Y", "X"]);
    }

    #[test]
    fn ties_are_broken_lexically() {
        let order = order_of(&[
            ("D", "afterany:C:B"),
            ("C", "afterok:A"),
            ("B", "after:A"),
            ("Z", ""),
            ("E", ""),
        ])
        .unwrap();
        assert_eq!(order, vec!["A", "B", "C", "D", "E", "Z"]);
    }

    #[test]
    fn two_node_cycle_is_reported() {
        match order_of(&[("A", "after:B"), ("B", "after:A")]) {
            Err(SlurmdagError::DagCycle(msg)) => {
                assert!(msg.contains("'A'"));
                assert!(msg.contains("'B'"));
            }
            other => panic!("expected DagCycle, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        match order_of(&[("A", "after:A")]) {
            Err(SlurmdagError::DagCycle(msg)) => assert!(msg.contains("'A'")),
            other => panic!("expected DagCycle, got {other:?}"),
        }
    }

    #[test]
    fn cycle_report_excludes_downstream_tasks() {
        match order_of(&[("A", "after:B"), ("B", "after:A"), ("C", "after:B")]) {
            Err(SlurmdagError::DagCycle(msg)) => assert!(!msg.contains("'C'")),
            other => panic!("expected DagCycle, got {other:?}"),
        }
    }

    #[test]
    fn suffixes_do_not_create_extra_nodes() {
        let order = order_of(&[("B", "afterok:A+5"), ("C", "aftercorr:B_1")]).unwrap();
        assert_eq!(order, vec!["A", "B", "C"]);
    }
}
