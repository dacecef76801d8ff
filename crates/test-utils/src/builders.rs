#![allow(dead_code)]

use slurmdag::config::{ConfigSection, RawSuiteFile, SuiteFile};
use slurmdag::types::DependencyMap;

/// Build a dependency map from `(task, expression)` pairs.
pub fn deps(pairs: &[(&str, &str)]) -> DependencyMap {
    pairs
        .iter()
        .map(|(task, expr)| (task.to_string(), expr.to_string()))
        .collect()
}

/// Builder for `SuiteFile` to simplify test setup.
pub struct SuiteFileBuilder {
    suite: RawSuiteFile,
}

impl SuiteFileBuilder {
    pub fn new() -> Self {
        Self {
            suite: RawSuiteFile::default(),
        }
    }

    pub fn depends(mut self, task: &str, expr: &str) -> Self {
        self.suite
            .dependency
            .insert(task.to_string(), expr.to_string());
        self
    }

    pub fn job(mut self, task: &str, cmd: &str) -> Self {
        self.suite.jobs.insert(task.to_string(), cmd.to_string());
        self
    }

    pub fn job_id(mut self, task: &str, id: &str) -> Self {
        self.suite.job_ids.record(task, id);
        self
    }

    pub fn default_command(mut self, cmd: &str) -> Self {
        self.suite.config.default_command = cmd.to_string();
        self
    }

    pub fn config(mut self, config: ConfigSection) -> Self {
        self.suite.config = config;
        self
    }

    pub fn raw(self) -> RawSuiteFile {
        self.suite
    }

    pub fn build(self) -> SuiteFile {
        SuiteFile::try_from(self.suite).expect("Failed to build valid suite from builder")
    }
}

impl Default for SuiteFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
