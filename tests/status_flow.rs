// tests/status_flow.rs

mod common;
use crate::common::builders::SuiteFileBuilder;
use crate::common::fake_scheduler::FakeAccounting;
use crate::common::init_tracing;

use std::error::Error;

use pretty_assertions::assert_eq;

use slurmdag::registry::{JobRegistry, StatusRow};
use slurmdag::render::DotRenderer;
use slurmdag::status::StatusTracker;
use slurmdag::suite::Suite;
use slurmdag::types::RankDir;

type TestResult = Result<(), Box<dyn Error>>;

fn row(task: &str, job_id: &str, state: Option<&str>) -> StatusRow {
    StatusRow {
        task: task.to_string(),
        job_id: job_id.to_string(),
        state: state.map(str::to_string),
    }
}

#[tokio::test]
async fn one_batched_query_covers_every_job() {
    init_tracing();

    let ids: JobRegistry = [("prep", "11"), ("train", "12"), ("eval", "13")]
        .into_iter()
        .collect();
    let fake = FakeAccounting::replying(
        "11|COMPLETED\n11.batch|COMPLETED\n12|RUNNING\n13|PENDING\n",
    );
    let queries = fake.queries();

    let rows = StatusTracker::new(fake).query(&ids).await;

    assert_eq!(*queries.lock().unwrap(), vec!["11,12,13".to_string()]);
    assert_eq!(
        rows,
        vec![
            row("prep", "11", Some("COMPLETED")),
            row("train", "12", Some("RUNNING")),
            row("eval", "13", Some("PENDING")),
        ]
    );
}

#[tokio::test]
async fn jobs_missing_from_accounting_have_no_state() {
    let ids: JobRegistry = [("A", "1"), ("B", "2")].into_iter().collect();
    let fake = FakeAccounting::replying("1|FAILED\n");

    let rows = StatusTracker::new(fake).query(&ids).await;

    assert_eq!(rows, vec![row("A", "1", Some("FAILED")), row("B", "2", None)]);
}

#[tokio::test]
async fn unavailable_accounting_degrades_to_empty() {
    init_tracing();

    let ids: JobRegistry = [("A", "1")].into_iter().collect();
    let fake = FakeAccounting::unavailable();
    let queries = fake.queries();

    let rows = StatusTracker::new(fake).query(&ids).await;

    assert!(rows.is_empty());
    assert_eq!(queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn nothing_submitted_means_no_query() {
    let fake = FakeAccounting::replying("1|RUNNING\n");
    let queries = fake.queries();

    let rows = StatusTracker::new(fake).query(&JobRegistry::new()).await;

    assert!(rows.is_empty());
    assert!(queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn suite_status_feeds_the_rendered_graph() -> TestResult {
    let file = SuiteFileBuilder::new()
        .depends("B", "afterok:A")
        .job_id("A", "41")
        .job_id("B", "42")
        .build();
    let mut suite = Suite::new(file);

    let rows = suite
        .update_status(FakeAccounting::replying("41|COMPLETED\n42|RUNNING\n"))
        .await;
    assert_eq!(rows.len(), 2);
    assert_eq!(suite.status.state_of("A"), Some("COMPLETED"));
    assert_eq!(suite.status.state_of("B"), Some("RUNNING"));

    let dot = suite.render(&DotRenderer, RankDir::LeftRight)?;
    assert!(dot.contains("\trankdir=LR\n"));
    assert!(dot.contains("\t\"A\" [label=\"A 41 COMPLETED\"]\n"));
    assert!(dot.contains("\t\"B\" [label=\"B 42 RUNNING\"]\n"));
    assert!(dot.contains("\t\"A\" -> \"B\"\n"));
    Ok(())
}
