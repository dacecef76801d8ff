// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::registry::JobRegistry;
use crate::types::{CommandMap, DependencyMap};

/// Suite file exactly as read from / written to TOML, before validation.
///
/// ```toml
/// [config]
/// default_command = "sbatch --wrap=\"sleep 2\""
///
/// [dependency]
/// B = "after:A"
/// C = "afterany:A:B"
///
/// [jobs]
/// A = "sbatch --mem 40G run.sh"
///
/// [job_ids]
/// A = "1001"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSuiteFile {
    /// Global behaviour from `[config]`.
    #[serde(default, skip_serializing_if = "ConfigSection::is_default")]
    pub config: ConfigSection,

    /// Task name -> dependency expression, from `[dependency]`.
    #[serde(default)]
    pub dependency: DependencyMap,

    /// Task name -> submission command override, from `[jobs]`.
    #[serde(default)]
    pub jobs: CommandMap,

    /// Task name -> job id of a previous submission, from `[job_ids]`.
    #[serde(default)]
    pub job_ids: JobRegistry,
}

/// `[config]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Command submitted for tasks that have no entry in `[jobs]`.
    #[serde(default = "default_command")]
    pub default_command: String,

    /// Submission executable; prepended to commands that lack it.
    #[serde(default = "default_submit_program")]
    pub submit_program: String,

    /// Accounting executable used by `status`.
    #[serde(default = "default_accounting_program")]
    pub accounting_program: String,
}

fn default_command() -> String {
    r#"sbatch --wrap="sleep 2""#.to_string()
}

fn default_submit_program() -> String {
    "sbatch".to_string()
}

fn default_accounting_program() -> String {
    "sacct".to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            default_command: default_command(),
            submit_program: default_submit_program(),
            accounting_program: default_accounting_program(),
        }
    }
}

impl ConfigSection {
    pub fn is_default(&self) -> bool {
        *self == ConfigSection::default()
    }
}

/// A validated suite: every expression parses and the graph is acyclic.
///
/// Obtain one through `TryFrom<RawSuiteFile>` (see `config::validate`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteFile {
    pub config: ConfigSection,
    pub dependency: DependencyMap,
    pub jobs: CommandMap,
    pub job_ids: JobRegistry,
}

impl SuiteFile {
    pub(crate) fn new_unchecked(raw: RawSuiteFile) -> Self {
        Self {
            config: raw.config,
            dependency: raw.dependency,
            jobs: raw.jobs,
            job_ids: raw.job_ids,
        }
    }
}

impl From<SuiteFile> for RawSuiteFile {
    fn from(file: SuiteFile) -> Self {
        Self {
            config: file.config,
            dependency: file.dependency,
            jobs: file.jobs,
            job_ids: file.job_ids,
        }
    }
}
