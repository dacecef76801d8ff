// src/spec/template.rs

//! Placeholder templates for dependency expressions.
//!
//! A [`Template`] is built once per task, before any job ids are known. Every
//! task name is replaced by a `{name}` placeholder while keywords, separators
//! and suffixes stay where they were:
//!
//! ```text
//! afterok:A+5:B_2,afterany:C   ->   afterok:{A}+5:{B}_2,afterany:{C}
//! ```
//!
//! Instantiation works on the segment list, never on the rendered text, so a
//! job id that happens to look like a placeholder is not substituted again.

use std::fmt;

use crate::errors::Result;
use crate::registry::JobRegistry;
use crate::spec::parser::{DependencyExpr, parse_expression};
use crate::types::TaskName;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(TaskName),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self::from_expr(&parse_expression(raw)?))
    }

    pub fn from_expr(expr: &DependencyExpr) -> Self {
        let mut template = Template::default();

        for (gi, group) in expr.groups.iter().enumerate() {
            if gi > 0 {
                template.push_literal(",");
            }
            for (ci, clause) in group.iter().enumerate() {
                if ci > 0 {
                    template.push_literal("?");
                }
                template.push_literal(clause.keyword.as_str());
                for r in &clause.refs {
                    template.push_literal(":");
                    template.segments.push(Segment::Placeholder(r.name.clone()));
                    if let Some(suffix) = &r.suffix {
                        template.push_literal(&suffix.to_string());
                    }
                }
            }
        }

        template
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Task names referenced by placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Placeholders that `job_ids` cannot resolve yet.
    pub fn unresolved<'a>(&'a self, job_ids: &'a JobRegistry) -> impl Iterator<Item = &'a str> {
        self.placeholders().filter(move |name| !job_ids.contains(name))
    }

    /// Render the template against the ids known so far.
    ///
    /// Unknown placeholders stay as literal `{name}` text.
    pub fn instantiate(&self, job_ids: &JobRegistry) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match job_ids.get(name) {
                    Some(id) => out.push_str(id),
                    None => push_placeholder(&mut out, name),
                },
            }
        }
        out
    }

    fn push_literal(&mut self, text: &str) {
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Literal(text.to_string()));
        }
    }
}

fn push_placeholder(out: &mut String, name: &str) {
    out.push('{');
    out.push_str(name);
    out.push('}');
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.instantiate(&JobRegistry::new()))
    }
}
