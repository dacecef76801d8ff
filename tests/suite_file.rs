// tests/suite_file.rs

mod common;
use crate::common::builders::SuiteFileBuilder;
use crate::common::fake_scheduler::FakeScheduler;

use std::error::Error;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use slurmdag::config::{ConfigSection, load_from_path};
use slurmdag::suite::Suite;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn suite_file_sections_are_read() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Slurmdag.toml");
    fs::write(
        &path,
        r#"
[config]
default_command = "sbatch --wrap=true"

[dependency]
B = "afterok:A"

[jobs]
A = "sbatch a.sh"
extra = "sbatch extra.sh"

[job_ids]
A = "500"
"#,
    )?;

    let suite = Suite::load(&path)?;

    assert_eq!(suite.path.as_deref(), Some(path.as_path()));
    assert_eq!(suite.file.config.default_command, "sbatch --wrap=true");
    assert_eq!(suite.file.config.submit_program, "sbatch");
    assert_eq!(suite.file.jobs.get("A").map(String::as_str), Some("sbatch a.sh"));
    assert_eq!(suite.file.job_ids.get("A"), Some("500"));
    assert_eq!(suite.order()?, vec!["A", "B", "extra"]);
    Ok(())
}

#[tokio::test]
async fn submitted_ids_survive_save_and_load() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("out").join("submit.toml");

    let file = SuiteFileBuilder::new()
        .depends("B", "afterok:A")
        .depends("C", "afterany:B")
        .build();
    let mut suite = Suite::new(file);
    suite.submit(FakeScheduler::new(300)).await?;
    suite.save(&path)?;

    let reloaded = Suite::load(&path)?;
    assert_eq!(reloaded.file, suite.file);
    assert_eq!(
        reloaded.file.job_ids.iter().collect::<Vec<_>>(),
        vec![("A", "300"), ("B", "301"), ("C", "302")]
    );
    Ok(())
}

#[test]
fn default_config_is_not_written_out() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("plain.toml");

    let suite = Suite::new(SuiteFileBuilder::new().depends("B", "after:A").build());
    suite.save(&path)?;

    let text = fs::read_to_string(&path)?;
    assert!(!text.contains("[config]"), "written file:\n{text}");
    assert!(text.contains("[dependency]"), "written file:\n{text}");

    let raw = load_from_path(&path)?;
    assert_eq!(raw.config, ConfigSection::default());
    Ok(())
}

#[test]
fn custom_config_is_kept_on_save() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("custom.toml");

    let config = ConfigSection {
        default_command: "sbatch job.sh".to_string(),
        ..ConfigSection::default()
    };
    let suite = Suite::new(SuiteFileBuilder::new().config(config.clone()).build());
    suite.save(&path)?;

    let raw = load_from_path(&path)?;
    assert_eq!(raw.config, config);
    Ok(())
}

#[test]
fn job_ids_keep_file_order_rather_than_sorting() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("order.toml");
    fs::write(
        &path,
        r#"
[jobs]
zeta = "sbatch z.sh"
alpha = "sbatch a.sh"

[job_ids]
zeta = "1"
alpha = "2"
"#,
    )?;

    let suite = Suite::load(&path)?;
    assert_eq!(
        suite.file.job_ids.iter().collect::<Vec<_>>(),
        vec![("zeta", "1"), ("alpha", "2")]
    );

    let copy = dir.path().join("copy.toml");
    suite.save(&copy)?;
    let reloaded = Suite::load(&copy)?;
    assert_eq!(
        reloaded.file.job_ids.iter().collect::<Vec<_>>(),
        vec![("zeta", "1"), ("alpha", "2")]
    );
    Ok(())
}
