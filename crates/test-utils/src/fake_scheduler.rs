use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use slurmdag::errors::{Result, SlurmdagError};
use slurmdag::exec::{AccountingBackend, CommandLine, SchedulerBackend};

/// One submission seen by [`FakeScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub task: String,
    /// The command as it would be printed.
    pub command: String,
    pub argv: Vec<String>,
    pub job_id: Option<String>,
}

/// A fake scheduler that:
/// - records every submitted command
/// - hands out sequential job ids starting at `first_id`
/// - optionally reports a cluster name, as `sbatch --parsable` does on
///   multi-cluster setups (`<id>;<cluster>`)
/// - fails for the tasks listed in `fail_on`.
#[derive(Clone)]
pub struct FakeScheduler {
    submitted: Arc<Mutex<Vec<Submitted>>>,
    next_id: u64,
    cluster: Option<String>,
    fail_on: Vec<String>,
}

impl FakeScheduler {
    pub fn new(first_id: u64) -> Self {
        Self {
            submitted: Arc::new(Mutex::new(Vec::new())),
            next_id: first_id,
            cluster: None,
            fail_on: Vec::new(),
        }
    }

    pub fn on_cluster(mut self, cluster: &str) -> Self {
        self.cluster = Some(cluster.to_string());
        self
    }

    pub fn failing_on(mut self, task: &str) -> Self {
        self.fail_on.push(task.to_string());
        self
    }

    /// Shared log of submissions; stays readable after the fake is moved.
    pub fn log(&self) -> Arc<Mutex<Vec<Submitted>>> {
        Arc::clone(&self.submitted)
    }
}

impl SchedulerBackend for FakeScheduler {
    fn submit(
        &mut self,
        task: String,
        command: CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let fail = self.fail_on.contains(&task);
        let job_id = if fail {
            None
        } else {
            let id = match &self.cluster {
                Some(cluster) => format!("{};{cluster}", self.next_id),
                None => self.next_id.to_string(),
            };
            self.next_id += 1;
            Some(id)
        };

        self.submitted.lock().unwrap().push(Submitted {
            task: task.clone(),
            command: command.to_string(),
            argv: command.into_argv(),
            job_id: job_id.clone(),
        });

        Box::pin(async move {
            match job_id {
                // sbatch --parsable prints the id followed by a newline
                Some(id) => Ok(format!("{id}\n")),
                None => Err(SlurmdagError::Submission {
                    task,
                    reason: "sbatch: error: Batch job submission failed".to_string(),
                }),
            }
        })
    }
}

/// Accounting backend returning a canned reply, or unavailable when `None`.
#[derive(Clone)]
pub struct FakeAccounting {
    reply: Option<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeAccounting {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queries(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.queries)
    }
}

impl AccountingBackend for FakeAccounting {
    fn query(
        &mut self,
        job_ids: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        self.queries.lock().unwrap().push(job_ids);
        let reply = self.reply.clone();

        Box::pin(async move {
            reply.ok_or_else(|| {
                SlurmdagError::Other(anyhow::anyhow!("sacct: command not found"))
            })
        })
    }
}
