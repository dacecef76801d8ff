// src/exec/process.rs

//! Blocking-until-done process invocations on top of `tokio::process`.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::debug;

/// Run `program` with `args` directly (no shell) and return its stdout.
pub async fn run_program(program: &str, args: &[String]) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);

    debug!(program, ?args, "running program");
    run_to_completion(&mut cmd)
        .await
        .with_context(|| format!("running `{program}`"))
}

async fn run_to_completion(cmd: &mut Command) -> Result<String> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = cmd.output().await.context("spawning process")?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);

    for line in stderr.lines() {
        debug!("stderr: {}", line);
    }

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        bail!("exited with status {code}: {}", stderr.trim());
    }

    Ok(stdout)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn stdout_is_returned() {
        let out = run_program("echo", &args(&["4242"])).await.unwrap();
        assert_eq!(out.trim(), "4242");
    }

    #[tokio::test]
    async fn arguments_are_not_interpreted_by_a_shell() {
        let out = run_program("echo", &args(&["afterok:1;echo", "$HOME"])).await.unwrap();
        assert_eq!(out.trim(), "afterok:1;echo $HOME");
    }

    #[tokio::test]
    async fn failing_program_reports_stderr() {
        let err = run_program("sh", &args(&["-c", "echo boom >&2; exit 3"]))
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("status 3"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let res = run_program("slurmdag-definitely-not-installed", &[]).await;
        assert!(res.is_err());
    }
}
