// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlurmdagError {
    #[error("Invalid dependency expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("Submission of task '{task}' failed: {reason}")]
    Submission { task: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlurmdagError {
    pub(crate) fn invalid_expression(expr: &str, reason: impl Into<String>) -> Self {
        SlurmdagError::InvalidExpression {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn submission(task: &str, reason: impl Into<String>) -> Self {
        SlurmdagError::Submission {
            task: task.to_string(),
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SlurmdagError>;
