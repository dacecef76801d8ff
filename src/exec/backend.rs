// src/exec/backend.rs

//! Pluggable scheduler backend abstractions.
//!
//! The orchestrator and status tracker talk to these traits instead of
//! spawning processes themselves, so tests can swap in fakes.
//!
//! - [`SchedulerBackend`] submits one command and returns the raw
//!   scheduler output (the job id, once trimmed).
//!   - [`SbatchBackend`] runs the command for real, without a shell.
//!   - [`DryRunBackend`] echoes the command and fabricates an id.
//! - [`AccountingBackend`] runs one batched accounting query.
//!   - [`SacctBackend`] uses `sacct`.

use std::future::Future;
use std::pin::Pin;

use tracing::info;
use uuid::Uuid;

use crate::errors::{Result, SlurmdagError};
use crate::exec::command_line::CommandLine;
use crate::exec::process::run_program;
use crate::types::TaskName;

/// Trait abstracting how a submission command is issued.
pub trait SchedulerBackend: Send {
    /// Submit `command` for `task` and return the raw scheduler output.
    fn submit(
        &mut self,
        task: TaskName,
        command: CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// Trait abstracting the scheduler's accounting interface.
pub trait AccountingBackend: Send {
    /// Query states for a comma-separated list of job ids.
    ///
    /// Returns the raw `jobid|state` text. An error means the interface is
    /// unavailable.
    fn query(
        &mut self,
        job_ids: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// Real submission backend: runs the program with its arguments directly.
#[derive(Debug, Clone, Default)]
pub struct SbatchBackend;

impl SbatchBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulerBackend for SbatchBackend {
    fn submit(
        &mut self,
        task: TaskName,
        command: CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(async move {
            let Some(program) = command.program() else {
                return Err(SlurmdagError::submission(&task, "empty command"));
            };
            info!(task = %task, cmd = %command, "submitting job");
            run_program(program, command.args())
                .await
                .map_err(|e| SlurmdagError::submission(&task, format!("{e:#}")))
        })
    }
}

/// Generator of fake job ids for dry runs.
pub type IdGenerator = Box<dyn FnMut() -> String + Send>;

/// Simulated submission: prints the command and returns a made-up job id.
pub struct DryRunBackend {
    id_gen: IdGenerator,
    echo: bool,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self {
            id_gen: Box::new(pseudo_job_id),
            echo: true,
        }
    }

    /// Replace the id generator (deterministic ids in tests).
    pub fn with_id_generator(mut self, id_gen: impl FnMut() -> String + Send + 'static) -> Self {
        self.id_gen = Box::new(id_gen);
        self
    }

    /// Whether to print each command on stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerBackend for DryRunBackend {
    fn submit(
        &mut self,
        task: TaskName,
        command: CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let job_id = (self.id_gen)();
        if self.echo {
            println!("{command}");
        }
        info!(task = %task, job_id = %job_id, "dry run: simulated submission");

        Box::pin(async move { Ok(job_id) })
    }
}

/// Pseudo-random six digit job id.
pub fn pseudo_job_id() -> String {
    let n = Uuid::new_v4().as_u128() % 900_000 + 100_000;
    n.to_string()
}

/// Accounting backend running `sacct -n -P --format=jobid,state -j <ids>`.
#[derive(Debug, Clone)]
pub struct SacctBackend {
    program: String,
}

impl SacctBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SacctBackend {
    fn default() -> Self {
        Self::new("sacct")
    }
}

impl AccountingBackend for SacctBackend {
    fn query(
        &mut self,
        job_ids: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let program = self.program.clone();

        Box::pin(async move {
            let args = vec![
                "-n".to_string(),
                "-P".to_string(),
                "--format=jobid,state".to_string(),
                "-j".to_string(),
                job_ids,
            ];
            Ok(run_program(&program, &args).await?)
        })
    }
}
