// src/render/dot.rs

use std::fmt::Write;

use crate::errors::{Error, Result};
use crate::render::{GraphView, Renderer};

/// Graphviz DOT output: one node per task in submission order, one edge per
/// dependency (dependency -> dependent).
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl Renderer for DotRenderer {
    fn render(&self, view: &GraphView<'_>) -> Result<String> {
        render_dot(view).map_err(|e| Error::from(e).into())
    }
}

fn render_dot(view: &GraphView<'_>) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "digraph {{")?;
    writeln!(out, "\trankdir={}", view.rankdir.as_str())?;

    for task in view.order {
        writeln!(
            out,
            "\t\"{}\" [label=\"{}\"]",
            escape(task),
            escape(&view.label_of(task))
        )?;
    }
    for (dep, dependent) in view.graph.edges() {
        writeln!(out, "\t\"{}\" -> \"{}\"", escape(dep), escape(dependent))?;
    }

    writeln!(out, "}}")?;
    Ok(out)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
