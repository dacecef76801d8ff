// src/render/mod.rs

//! Rendering of the dependency graph.
//!
//! The core never renders anything itself; it only exposes a read-only
//! [`GraphView`] that a [`Renderer`] turns into text. [`dot`] ships a
//! Graphviz DOT renderer.

pub mod dot;

pub use dot::DotRenderer;

use crate::dag::DagGraph;
use crate::errors::Result;
use crate::registry::{JobRegistry, StatusRegistry};
use crate::types::{RankDir, TaskName};

/// Everything a renderer may look at.
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    pub graph: &'a DagGraph,
    pub order: &'a [TaskName],
    pub job_ids: &'a JobRegistry,
    pub status: &'a StatusRegistry,
    pub rankdir: RankDir,
}

impl GraphView<'_> {
    /// Node label: task name, then job id and state when known.
    pub fn label_of(&self, task: &str) -> String {
        let mut parts = vec![task];
        if let Some(id) = self.job_ids.get(task) {
            parts.push(id);
        }
        if let Some(state) = self.status.state_of(task) {
            parts.push(state);
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

/// Turns a [`GraphView`] into a textual diagram.
pub trait Renderer {
    fn render(&self, view: &GraphView<'_>) -> Result<String>;
}
