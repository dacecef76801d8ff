// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `slurmdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "slurmdag",
    version,
    about = "Submit Slurm jobs in dependency order.",
    long_about = "Define task dependencies in a TOML suite file, inspect the \
                  dependency graph, submit the jobs to Slurm in dependency order \
                  and check the status of the submitted suite."
)]
pub struct CliArgs {
    /// Path to the suite file (TOML).
    ///
    /// Falls back to the `SFILE` environment variable. Without either, an
    /// empty suite is used.
    #[arg(short = 'f', long = "file", value_name = "PATH", env = "SFILE", global = true)]
    pub file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SLURMDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the dependency graph as Graphviz DOT.
    Vis {
        /// Direction of the graph layout: LR, RL, TB, BT (or right, left,
        /// down, up).
        #[arg(long, default_value = "LR")]
        rankdir: String,
    },

    /// Submit the jobs to Slurm and record their job ids in the suite file.
    Submit {
        /// Simulate submission with fake job ids; nothing is written back.
        #[arg(long)]
        dry_run: bool,

        /// Forget previously recorded job ids and submit every task again.
        #[arg(long)]
        fresh: bool,
    },

    /// Query Slurm accounting for the state of the submitted jobs.
    Status {
        /// Also print the graph annotated with job states.
        #[arg(long)]
        vis: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
