// src/submit/mod.rs

//! Job submission.
//!
//! - [`command`] builds `sbatch` argument vectors from user commands.
//! - [`orchestrator`] walks the dependency order, resolves placeholders and
//!   records the ids returned by the scheduler.

pub mod command;
pub mod orchestrator;

pub use command::build_command;
pub use orchestrator::{Orchestrator, SubmissionReport, SubmitSettings};
