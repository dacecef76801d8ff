// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod render;
pub mod spec;
pub mod status;
pub mod submit;
pub mod suite;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::loader::{FALLBACK_SUBMIT_FILE, resolve_suite_path};
use crate::exec::{DryRunBackend, SacctBackend, SbatchBackend, SchedulerBackend};
use crate::fs::RealFileSystem;
use crate::registry::JobRegistry;
use crate::render::DotRenderer;
use crate::submit::SubmissionReport;
use crate::suite::Suite;
use crate::types::RankDir;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - suite file loading (and writing back after a real submission)
/// - the submission orchestrator with `sbatch` or the dry-run backend
/// - the status tracker
/// - DOT rendering
pub async fn run(args: CliArgs) -> Result<()> {
    run_with(args, SbatchBackend::new()).await
}

/// Same as [`run`], with real submissions going through `scheduler`.
pub async fn run_with<B: SchedulerBackend>(args: CliArgs, scheduler: B) -> Result<()> {
    let mut suite = load_suite(args.file.as_deref())?;

    match args.command {
        Command::Vis { rankdir } => {
            let rankdir = resolve_rankdir(&rankdir);
            print!("{}", suite.render(&DotRenderer, rankdir)?);
        }
        Command::Submit { dry_run: true, .. } => {
            run_dry_submit(&suite).await?;
        }
        Command::Submit { dry_run: false, fresh } => {
            run_submit(&mut suite, scheduler, fresh).await?;
        }
        Command::Status { vis } => {
            let backend = SacctBackend::new(suite.file.config.accounting_program.clone());
            let rows = suite.update_status(backend).await;
            for row in &rows {
                println!(
                    "{}  {}  {}",
                    row.task,
                    row.job_id,
                    row.state.as_deref().unwrap_or("-")
                );
            }
            if vis {
                print!("{}", suite.render(&DotRenderer, RankDir::default())?);
            }
        }
    }

    Ok(())
}

fn load_suite(explicit: Option<&Path>) -> Result<Suite> {
    match resolve_suite_path(&RealFileSystem, explicit) {
        Some(path) => Ok(Suite::load(path)?),
        None => {
            info!("no suite file given; starting from an empty suite");
            Ok(Suite::default())
        }
    }
}

/// Simulate submitting every task, ignoring recorded job ids. Nothing is
/// written back.
async fn run_dry_submit(suite: &Suite) -> Result<()> {
    let mut preview = dry_run_copy(suite);
    preview.submit(DryRunBackend::new()).await?;
    print_job_ids(&preview);
    Ok(())
}

/// Copy of `suite` with an empty job registry.
fn dry_run_copy(suite: &Suite) -> Suite {
    let mut preview = suite.clone();
    if !preview.file.job_ids.is_empty() {
        info!(
            recorded = preview.file.job_ids.len(),
            "dry run ignores recorded job ids and simulates every task"
        );
        preview.file.job_ids = JobRegistry::new();
    }
    preview
}

/// Submit the suite and write it back.
///
/// The suite is written back even after a failed pass, so the next run can
/// resume. Recorded ids are printed before writing, so they are visible even
/// if the write fails.
async fn run_submit<B: SchedulerBackend>(suite: &mut Suite, scheduler: B, fresh: bool) -> Result<()> {
    if fresh {
        info!("discarding previously recorded job ids");
        suite.file.job_ids = JobRegistry::new();
    }

    let outcome = suite.submit(scheduler).await;
    print_job_ids(suite);

    let path = suite
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SUBMIT_FILE));
    let saved = suite.save(&path);

    let report = settle(outcome, saved)?;
    debug!(
        submitted = report.submitted.len(),
        skipped = report.skipped.len(),
        "submission pass finished"
    );
    Ok(())
}

/// Combine a submission outcome with the result of writing the suite back.
///
/// A submission error takes precedence; a write error next to it is logged.
fn settle(
    outcome: errors::Result<SubmissionReport>,
    saved: errors::Result<()>,
) -> errors::Result<SubmissionReport> {
    match (outcome, saved) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(save_err)) => Err(save_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(save_err)) => {
            error!(error = %save_err, "could not write back the suite file");
            Err(err)
        }
    }
}

fn print_job_ids(suite: &Suite) {
    for (task, job_id) in suite.file.job_ids.iter() {
        println!("{task}: {job_id}");
    }
}

/// Parse a `--rankdir` value, falling back to left-to-right.
fn resolve_rankdir(raw: &str) -> RankDir {
    raw.parse().unwrap_or_else(|err| {
        warn!(%err, "using default left-to-right layout");
        RankDir::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SlurmdagError;

    fn submission_error() -> SlurmdagError {
        SlurmdagError::Submission {
            task: "B".into(),
            reason: "sbatch: error".into(),
        }
    }

    fn write_error() -> SlurmdagError {
        SlurmdagError::IoError(std::io::Error::other("read-only file system"))
    }

    #[test]
    fn submission_error_wins_over_write_error() {
        let err = settle(Err(submission_error()), Err(write_error())).unwrap_err();
        assert!(matches!(err, SlurmdagError::Submission { task, .. } if task == "B"));
    }

    #[test]
    fn write_error_after_clean_pass_is_reported() {
        let err = settle(Ok(SubmissionReport::default()), Err(write_error())).unwrap_err();
        assert!(matches!(err, SlurmdagError::IoError(_)));
    }

    #[test]
    fn clean_pass_and_write_succeed() {
        assert!(settle(Ok(SubmissionReport::default()), Ok(())).is_ok());
    }

    #[tokio::test]
    async fn dry_run_simulates_tasks_that_already_have_ids() {
        let deps = [("B".to_string(), "after:A".to_string())].into_iter().collect();
        let mut suite = Suite::from_dependencies(deps).unwrap();
        suite.file.job_ids.record("A", "7");

        let mut preview = dry_run_copy(&suite);
        let report = preview
            .submit(DryRunBackend::new().with_echo(false))
            .await
            .unwrap();

        assert_eq!(report.submitted.len(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(suite.file.job_ids.len(), 1);
        assert_eq!(suite.file.job_ids.get("A"), Some("7"));
    }

    #[test]
    fn rankdir_falls_back_to_left_right() {
        assert_eq!(resolve_rankdir("up"), RankDir::BottomTop);
        assert_eq!(resolve_rankdir("sideways"), RankDir::LeftRight);
    }
}
