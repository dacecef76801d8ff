// src/config/validate.rs

use tracing::warn;

use crate::config::model::{RawSuiteFile, SuiteFile};
use crate::dag::DagGraph;
use crate::errors::{Result, SlurmdagError};
use crate::exec::split_words;

impl TryFrom<RawSuiteFile> for SuiteFile {
    type Error = SlurmdagError;

    fn try_from(raw: RawSuiteFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_suite(&raw)?;
        Ok(SuiteFile::new_unchecked(raw))
    }
}

fn validate_raw_suite(raw: &RawSuiteFile) -> Result<()> {
    validate_global_config(raw)?;
    validate_commands(raw)?;
    let graph = DagGraph::from_dependencies(&raw.dependency)?;
    graph.topological_order()?;
    check_recorded_job_ids(raw, &graph);
    Ok(())
}

fn validate_global_config(raw: &RawSuiteFile) -> Result<()> {
    if raw.config.default_command.trim().is_empty() {
        return Err(SlurmdagError::ConfigError(
            "[config].default_command must not be empty".to_string(),
        ));
    }
    if raw.config.submit_program.trim().is_empty() {
        return Err(SlurmdagError::ConfigError(
            "[config].submit_program must not be empty".to_string(),
        ));
    }
    if raw.config.accounting_program.trim().is_empty() {
        return Err(SlurmdagError::ConfigError(
            "[config].accounting_program must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// The default command and every `[jobs]` entry must have balanced quotes.
fn validate_commands(raw: &RawSuiteFile) -> Result<()> {
    split_words(&raw.config.default_command).map_err(|reason| {
        SlurmdagError::ConfigError(format!("[config].default_command: {reason}"))
    })?;
    for (task, command) in &raw.jobs {
        split_words(command).map_err(|reason| {
            SlurmdagError::ConfigError(format!("[jobs].{task}: {reason}"))
        })?;
    }
    Ok(())
}

/// Job ids for tasks that no longer exist are kept but reported.
fn check_recorded_job_ids(raw: &RawSuiteFile, graph: &DagGraph) {
    for (task, job_id) in raw.job_ids.iter() {
        if !graph.contains(task) && !raw.jobs.contains_key(task) {
            warn!(task, job_id, "[job_ids] entry for a task not in the suite");
        }
    }
}
