// tests/submission_flow.rs

mod common;
use crate::common::builders::{SuiteFileBuilder, deps};
use crate::common::fake_scheduler::{FakeScheduler, Submitted};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;

use pretty_assertions::assert_eq;

use slurmdag::errors::SlurmdagError;
use slurmdag::exec::DryRunBackend;
use slurmdag::registry::JobRegistry;
use slurmdag::submit::{Orchestrator, SubmitSettings};
use slurmdag::suite::Suite;
use slurmdag::types::CommandMap;

type TestResult = Result<(), Box<dyn Error>>;

fn has_arg(submitted: &Submitted, arg: &str) -> bool {
    submitted.argv.iter().any(|a| a == arg)
}

#[tokio::test]
async fn dry_run_of_three_task_chain() -> TestResult {
    with_timeout(async {
        init_tracing();

        let mut suite = Suite::from_dependencies(deps(&[
            ("A", ""),
            ("B", "after:A"),
            ("C", "afterany:A:B"),
        ]))?;

        let mut next = ["9001", "9002", "9003"].into_iter();
        let backend = DryRunBackend::new()
            .with_echo(false)
            .with_id_generator(move || next.next().map(|s| s.to_string()).unwrap_or_default());

        let report = suite.submit(backend).await?;

        assert_eq!(report.order, vec!["A", "B", "C"]);
        assert_eq!(suite.file.job_ids.len(), 3);
        assert_eq!(
            suite.file.job_ids.iter().collect::<Vec<_>>(),
            vec![("A", "9001"), ("B", "9002"), ("C", "9003")]
        );

        let c = report.command_of("C").ok_or("no command for C")?;
        assert_eq!(
            c,
            "sbatch --parsable --dependency=afterany:9001:9002 '--wrap=sleep 2'"
        );
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn dependency_flags_only_reference_earlier_submissions() -> TestResult {
    with_timeout(async {
        init_tracing();

        let map = deps(&[
            ("D", "afterany:C:B"),
            ("C", "afterok:A"),
            ("B", "after:A+5"),
            ("E", "aftercorr:D_1?afternotok:A"),
        ]);
        let fake = FakeScheduler::new(100);
        let log = fake.log();
        let mut ids = JobRegistry::new();
        let mut orch = Orchestrator::new(fake, SubmitSettings::default());

        orch.submit(&map, &CommandMap::new(), &mut ids).await?;

        let submitted = log.lock().unwrap().clone();
        let order: Vec<&str> = submitted.iter().map(|s| s.task.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D", "E"]);

        assert!(!submitted[0].argv.iter().any(|a| a.starts_with("--dependency")));
        assert!(has_arg(&submitted[1], "--dependency=after:100+5"));
        assert!(has_arg(&submitted[2], "--dependency=afterok:100"));
        assert!(has_arg(&submitted[3], "--dependency=afterany:102:101"));
        assert!(has_arg(&submitted[4], "--dependency=aftercorr:103_1?afternotok:100"));
        assert!(submitted.iter().all(|s| !s.command.contains('{')));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn failed_submission_preserves_progress_and_resumes() -> TestResult {
    with_timeout(async {
        init_tracing();

        let file = SuiteFileBuilder::new()
            .depends("B", "afterok:A")
            .depends("C", "afterok:B")
            .build();
        let mut suite = Suite::new(file);

        let failing = FakeScheduler::new(1).failing_on("B");
        let err = suite.submit(failing).await.unwrap_err();
        match err {
            SlurmdagError::Submission { task, .. } => assert_eq!(task, "B"),
            other => panic!("expected Submission error, got {other:?}"),
        }
        assert_eq!(suite.file.job_ids.iter().collect::<Vec<_>>(), vec![("A", "1")]);

        let healthy = FakeScheduler::new(50);
        let log = healthy.log();
        let report = suite.submit(healthy).await?;

        assert_eq!(report.skipped, vec!["A"]);
        let submitted = log.lock().unwrap().clone();
        assert_eq!(submitted.len(), 2);
        assert!(has_arg(&submitted[0], "--dependency=afterok:1"));
        assert!(has_arg(&submitted[1], "--dependency=afterok:50"));
        assert_eq!(
            suite.file.job_ids.iter().collect::<Vec<_>>(),
            vec![("A", "1"), ("B", "50"), ("C", "51")]
        );
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn resubmitting_a_complete_suite_changes_nothing() -> TestResult {
    with_timeout(async {
        let file = SuiteFileBuilder::new()
            .depends("B", "after:A")
            .job_id("A", "7")
            .job_id("B", "8")
            .build();
        let mut suite = Suite::new(file);

        let fake = FakeScheduler::new(1);
        let log = fake.log();
        let report = suite.submit(fake).await?;

        assert!(report.submitted.is_empty());
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(suite.file.job_ids.get("B"), Some("8"));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn user_commands_keep_their_own_flags() -> TestResult {
    with_timeout(async {
        let file = SuiteFileBuilder::new()
            .depends("B", "after:A")
            .job("A", "sbatch --parsable --mem 40G a.sh")
            .job("B", "b.sh")
            .job("solo", "sbatch --time=10 solo.sh")
            .build();
        let mut suite = Suite::new(file);

        let fake = FakeScheduler::new(1);
        let log = fake.log();
        suite.submit(fake).await?;

        let submitted = log.lock().unwrap().clone();
        let find = |task: &str| {
            submitted
                .iter()
                .find(|s| s.task == task)
                .map(|s| s.command.clone())
                .unwrap_or_default()
        };
        assert_eq!(find("A"), "sbatch --parsable --mem 40G a.sh");
        assert_eq!(find("B"), "sbatch --parsable --dependency=after:1 b.sh");
        assert_eq!(find("solo"), "sbatch --parsable --time=10 solo.sh");
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn cluster_qualified_job_ids_are_passed_through_verbatim() -> TestResult {
    with_timeout(async {
        init_tracing();

        let file = SuiteFileBuilder::new()
            .depends("B", "afterok:A")
            .job("A", "sbatch a.sh")
            .job("B", "sbatch b.sh")
            .build();
        let mut suite = Suite::new(file);

        let fake = FakeScheduler::new(101).on_cluster("mycluster");
        let log = fake.log();
        suite.submit(fake).await?;

        assert_eq!(suite.file.job_ids.get("A"), Some("101;mycluster"));
        assert_eq!(suite.file.job_ids.get("B"), Some("102;mycluster"));

        let submitted = log.lock().unwrap().clone();
        assert_eq!(
            submitted[1].argv,
            vec![
                "sbatch",
                "--parsable",
                "--dependency=afterok:101;mycluster",
                "b.sh"
            ]
        );
        assert_eq!(
            submitted[1].command,
            "sbatch --parsable '--dependency=afterok:101;mycluster' b.sh"
        );
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}
