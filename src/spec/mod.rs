// src/spec/mod.rs

//! Dependency expressions.
//!
//! - [`parser`] turns a raw `sbatch --dependency` style expression into a
//!   structured [`DependencyExpr`].
//! - [`template`] rewrites an expression into a [`Template`] whose task names
//!   are placeholders, resolved later against known job ids.

pub mod parser;
pub mod template;

pub use parser::{Clause, DependencyExpr, Keyword, Suffix, TaskRef, parse_expression};
pub use template::Template;

use std::collections::BTreeMap;

use crate::errors::{Result, SlurmdagError};
use crate::types::{DependencyMap, TaskName};

/// Parse every expression of a dependency map, failing on the first bad one.
///
/// The error names the task whose expression is malformed.
pub fn parse_dependency_map(deps: &DependencyMap) -> Result<BTreeMap<TaskName, DependencyExpr>> {
    deps.iter()
        .map(|(task, raw)| match parse_expression(raw) {
            Ok(expr) => Ok((task.clone(), expr)),
            Err(SlurmdagError::InvalidExpression { expr, reason }) => {
                Err(SlurmdagError::InvalidExpression {
                    expr,
                    reason: format!("task '{task}': {reason}"),
                })
            }
            Err(other) => Err(other),
        })
        .collect()
}
