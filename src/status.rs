// src/status.rs

//! Job state lookup through the scheduler's accounting interface.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::exec::AccountingBackend;
use crate::registry::{JobRegistry, StatusRow};

pub struct StatusTracker<A: AccountingBackend> {
    backend: A,
}

impl<A: AccountingBackend> StatusTracker<A> {
    pub fn new(backend: A) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    /// Query the state of every job in `job_ids` with one batched call.
    ///
    /// Rows come back in registry order. Status is advisory: an empty
    /// registry makes no call, and an unavailable accounting interface yields
    /// no rows instead of an error.
    pub async fn query(&mut self, job_ids: &JobRegistry) -> Vec<StatusRow> {
        if job_ids.is_empty() {
            debug!("no submitted jobs; skipping accounting query");
            return Vec::new();
        }

        let ids = job_ids.job_ids().collect::<Vec<_>>().join(",");
        let output = match self.backend.query(ids).await {
            Ok(out) => out,
            Err(err) => {
                warn!(error = %err, "accounting interface unavailable; no status reported");
                return Vec::new();
            }
        };

        let states = parse_accounting_output(&output);
        job_ids
            .iter()
            .map(|(task, id)| StatusRow {
                task: task.to_string(),
                job_id: id.to_string(),
                state: states.get(id).map(|s| s.to_string()),
            })
            .collect()
    }
}

/// Parse `jobid|state` lines. The first row seen for a job id wins; rows
/// for job steps (`123.batch`) are kept under their own id.
pub fn parse_accounting_output(output: &str) -> HashMap<&str, &str> {
    let mut states = HashMap::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.split_once('|') {
            Some((id, rest)) => {
                let state = rest.split('|').next().unwrap_or_default().trim();
                states.entry(id.trim()).or_insert(state);
            }
            None => debug!(line, "ignoring malformed accounting line"),
        }
    }
    states
}
