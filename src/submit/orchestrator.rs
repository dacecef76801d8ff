// src/submit/orchestrator.rs

//! Submission of a whole dependency map, in dependency order.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::model::ConfigSection;
use crate::dag::DagGraph;
use crate::errors::{Result, SlurmdagError};
use crate::exec::{SchedulerBackend, split_words};
use crate::registry::JobRegistry;
use crate::spec::{Template, parse_dependency_map};
use crate::submit::command::build_command;
use crate::types::{CommandMap, DependencyMap, TaskName};

/// Settings the orchestrator needs from the suite configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSettings {
    /// Command used for tasks without an entry in `jobs`.
    pub default_command: String,
    /// Name of the submission executable (`sbatch`).
    pub submit_program: String,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self::from(&ConfigSection::default())
    }
}

impl From<&ConfigSection> for SubmitSettings {
    fn from(cfg: &ConfigSection) -> Self {
        Self {
            default_command: cfg.default_command.clone(),
            submit_program: cfg.submit_program.clone(),
        }
    }
}

/// What a completed pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    /// Full submission order.
    pub order: Vec<TaskName>,
    /// `(task, command line)` for every task submitted in this pass, quoted
    /// for display.
    pub submitted: Vec<(TaskName, String)>,
    /// Tasks that already had a job id and were left alone.
    pub skipped: Vec<TaskName>,
}

impl SubmissionReport {
    pub fn command_of(&self, task: &str) -> Option<&str> {
        self.submitted
            .iter()
            .find(|(name, _)| name == task)
            .map(|(_, cmd)| cmd.as_str())
    }
}

/// Walks the dependency order and submits every task through a
/// [`SchedulerBackend`], one at a time.
pub struct Orchestrator<B: SchedulerBackend> {
    backend: B,
    settings: SubmitSettings,
}

impl<B: SchedulerBackend> Orchestrator<B> {
    pub fn new(backend: B, settings: SubmitSettings) -> Self {
        Self { backend, settings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Submit every task of `deps` (plus every task that only appears in
    /// `jobs`), recording ids in `job_ids`.
    ///
    /// Tasks already present in `job_ids` are not submitted again; their ids
    /// are reused by dependents. Parsing, ordering and command splitting
    /// happen before the first submission, so a malformed expression, a cycle
    /// or an unbalanced quote causes no backend call at all.
    ///
    /// On a failed submission the pass stops and `job_ids` keeps everything
    /// recorded up to that point.
    pub async fn submit(
        &mut self,
        deps: &DependencyMap,
        jobs: &CommandMap,
        job_ids: &mut JobRegistry,
    ) -> Result<SubmissionReport> {
        let mut all = deps.clone();
        for task in jobs.keys() {
            all.entry(task.clone()).or_default();
        }

        let parsed = parse_dependency_map(&all)?;
        let order = DagGraph::from_parsed(&parsed).topological_order()?;
        let templates: BTreeMap<&str, Template> = parsed
            .iter()
            .filter(|(_, expr)| !expr.is_empty())
            .map(|(task, expr)| (task.as_str(), Template::from_expr(expr)))
            .collect();

        let mut base_commands = BTreeMap::new();
        for task in &order {
            let line = jobs
                .get(task)
                .map(String::as_str)
                .unwrap_or(self.settings.default_command.as_str());
            let words = split_words(line).map_err(|reason| {
                SlurmdagError::ConfigError(format!("command of task '{task}': {reason}"))
            })?;
            base_commands.insert(task.as_str(), words);
        }

        info!(tasks = order.len(), "submitting tasks in dependency order");

        let mut report = SubmissionReport {
            order: order.clone(),
            ..SubmissionReport::default()
        };

        for task in &order {
            if let Some(existing) = job_ids.get(task) {
                info!(task = %task, job_id = %existing, "task already submitted; skipping");
                report.skipped.push(task.clone());
                continue;
            }

            let dependency = match templates.get(task.as_str()) {
                Some(template) => {
                    let missing: Vec<&str> = template.unresolved(job_ids).collect();
                    if !missing.is_empty() {
                        return Err(SlurmdagError::submission(
                            task,
                            format!("unresolved dependencies: {}", missing.join(", ")),
                        ));
                    }
                    Some(template.instantiate(job_ids))
                }
                None => None,
            };

            let words = base_commands.remove(task.as_str()).unwrap_or_default();
            let command = build_command(
                words,
                &self.settings.submit_program,
                dependency.as_deref(),
            );
            let rendered = command.to_string();
            debug!(task = %task, cmd = %rendered, "prepared submission command");

            let output = self.backend.submit(task.clone(), command).await?;
            let job_id = output.trim();
            if job_id.is_empty() {
                warn!(task = %task, "scheduler returned no job id");
                return Err(SlurmdagError::submission(
                    task,
                    "scheduler returned an empty job id",
                ));
            }

            info!(task = %task, job_id = %job_id, "task submitted");
            job_ids.record(task.clone(), job_id);
            report.submitted.push((task.clone(), rendered));
        }

        Ok(report)
    }
}
