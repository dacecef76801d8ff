// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually talking to the batch scheduler,
//! using `tokio::process::Command`.
//!
//! - [`command_line`] splits task commands into argument vectors and
//!   quotes them again for display.
//! - [`process`] runs a program with its arguments and collects its stdout.
//! - [`backend`] provides the `SchedulerBackend` / `AccountingBackend`
//!   traits with the real (`sbatch`, `sacct`) and dry-run implementations.
//!   Tests replace them with fakes.

pub mod backend;
pub mod command_line;
pub mod process;

pub use backend::{
    AccountingBackend, DryRunBackend, IdGenerator, SacctBackend, SbatchBackend,
    SchedulerBackend, pseudo_job_id,
};
pub use command_line::{CommandLine, split_words};
