// src/spec/parser.rs

//! Parser for Slurm-style dependency expressions.
//!
//! Grammar (whitespace around tokens is ignored):
//!
//! ```text
//! expr    := group ("," group)*
//! group   := clause ("?" clause)*
//! clause  := keyword (":" taskref)*
//! taskref := name | name "+" offset | name "_" index
//! ```
//!
//! Separators are kept as structure so that an expression can be written back
//! unchanged (see the `Display` impls).

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, SlurmdagError};
use crate::types::TaskName;

/// Dependency relation keywords understood by `sbatch --dependency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    After,
    AfterOk,
    AfterNotOk,
    AfterAny,
    AfterCorr,
    AfterBurstBuffer,
    Singleton,
}

impl Keyword {
    pub const ALL: [Keyword; 7] = [
        Keyword::After,
        Keyword::AfterOk,
        Keyword::AfterNotOk,
        Keyword::AfterAny,
        Keyword::AfterCorr,
        Keyword::AfterBurstBuffer,
        Keyword::Singleton,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::After => "after",
            Keyword::AfterOk => "afterok",
            Keyword::AfterNotOk => "afternotok",
            Keyword::AfterAny => "afterany",
            Keyword::AfterCorr => "aftercorr",
            Keyword::AfterBurstBuffer => "afterburstbuffer",
            Keyword::Singleton => "singleton",
        }
    }
}

impl FromStr for Keyword {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Keyword::ALL
            .iter()
            .copied()
            .find(|kw| kw.as_str() == s)
            .ok_or_else(|| format!("unknown dependency keyword '{s}'"))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque suffix attached to a task reference. Never part of the task name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// `+<minutes>` time offset.
    Offset(String),
    /// `_<index>` array index.
    Index(String),
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suffix::Offset(v) => write!(f, "+{v}"),
            Suffix::Index(v) => write!(f, "_{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub name: TaskName,
    pub suffix: Option<Suffix>,
}

impl TaskRef {
    /// Split a raw reference into name and suffix. `+` wins over `_` when a
    /// reference contains both.
    fn parse(raw: &str) -> Self {
        if let Some((name, offset)) = raw.split_once('+') {
            return TaskRef {
                name: name.to_string(),
                suffix: Some(Suffix::Offset(offset.to_string())),
            };
        }
        if let Some((name, index)) = raw.split_once('_') {
            return TaskRef {
                name: name.to_string(),
                suffix: Some(Suffix::Index(index.to_string())),
            };
        }
        TaskRef {
            name: raw.to_string(),
            suffix: None,
        }
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

/// A single `keyword:ref:ref...` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub keyword: Keyword,
    pub refs: Vec<TaskRef>,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword.as_str())?;
        for r in &self.refs {
            write!(f, ":{r}")?;
        }
        Ok(())
    }
}

/// A fully parsed dependency expression.
///
/// `groups` holds the `,`-separated groups; each group holds its
/// `?`-separated clauses. An empty expression has no groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyExpr {
    pub groups: Vec<Vec<Clause>>,
}

impl DependencyExpr {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.groups.iter().flatten()
    }

    /// Bare names of all referenced tasks, in order of appearance.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.clauses()
            .flat_map(|c| c.refs.iter())
            .map(|r| r.name.as_str())
    }
}

impl fmt::Display for DependencyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (gi, group) in self.groups.iter().enumerate() {
            if gi > 0 {
                f.write_str(",")?;
            }
            for (ci, clause) in group.iter().enumerate() {
                if ci > 0 {
                    f.write_str("?")?;
                }
                write!(f, "{clause}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for DependencyExpr {
    type Err = SlurmdagError;

    fn from_str(s: &str) -> Result<Self> {
        parse_expression(s)
    }
}

/// Parse one raw dependency expression.
///
/// An empty (or all-whitespace) expression yields an empty [`DependencyExpr`].
pub fn parse_expression(raw: &str) -> Result<DependencyExpr> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DependencyExpr::default());
    }

    let mut groups = Vec::new();
    for group in trimmed.split(',') {
        let clauses = group
            .split('?')
            .map(|clause| parse_clause(raw, clause))
            .collect::<Result<Vec<_>>>()?;
        groups.push(clauses);
    }

    Ok(DependencyExpr { groups })
}

fn parse_clause(expr: &str, clause: &str) -> Result<Clause> {
    let mut tokens = clause.split(':').map(str::trim);

    let head = tokens.next().unwrap_or_default();
    if head.is_empty() {
        return Err(SlurmdagError::invalid_expression(
            expr,
            format!("group '{clause}' is missing a dependency keyword"),
        ));
    }
    let keyword = Keyword::from_str(head).map_err(|reason| {
        SlurmdagError::invalid_expression(expr, format!("group '{clause}': {reason}"))
    })?;

    let mut refs = Vec::new();
    for token in tokens {
        let r = TaskRef::parse(token);
        if r.name.is_empty() {
            return Err(SlurmdagError::invalid_expression(
                expr,
                format!("group '{clause}' contains an empty task reference"),
            ));
        }
        if Keyword::from_str(&r.name).is_ok() {
            return Err(SlurmdagError::invalid_expression(
                expr,
                format!("group '{clause}' uses keyword '{}' as a task name", r.name),
            ));
        }
        refs.push(r);
    }

    Ok(Clause { keyword, refs })
}
