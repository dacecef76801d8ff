// src/suite.rs

//! A loaded suite: the dependency map, command overrides and job ids, plus
//! the last observed job states.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::loader::{load_and_validate, save_to_path};
use crate::config::model::{RawSuiteFile, SuiteFile};
use crate::dag::DagGraph;
use crate::errors::Result;
use crate::exec::{AccountingBackend, SchedulerBackend};
use crate::registry::{StatusRegistry, StatusRow};
use crate::render::{GraphView, Renderer};
use crate::status::StatusTracker;
use crate::submit::{Orchestrator, SubmissionReport, SubmitSettings};
use crate::types::{DependencyMap, RankDir, TaskName};

#[derive(Debug, Clone, Default)]
pub struct Suite {
    pub file: SuiteFile,
    pub status: StatusRegistry,
    /// Where the suite was loaded from, if anywhere.
    pub path: Option<PathBuf>,
}

impl Suite {
    pub fn new(file: SuiteFile) -> Self {
        Self {
            file,
            status: StatusRegistry::default(),
            path: None,
        }
    }

    pub fn from_dependencies(dependency: DependencyMap) -> Result<Self> {
        let file = SuiteFile::try_from(RawSuiteFile {
            dependency,
            ..Default::default()
        })?;
        Ok(Self::new(file))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = load_and_validate(path)?;
        info!(path = %path.display(), tasks = file.dependency.len(), "loaded suite file");
        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::new(file)
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        save_to_path(&self.file, path)?;
        info!(path = %path.display(), jobs = self.file.job_ids.len(), "saved suite file");
        Ok(())
    }

    /// Dependency graph over every task of the suite.
    pub fn graph(&self) -> Result<DagGraph> {
        DagGraph::from_dependencies(&self.all_dependencies())
    }

    /// Submission order over every task of the suite.
    pub fn order(&self) -> Result<Vec<TaskName>> {
        self.graph()?.topological_order()
    }

    /// Submit all tasks that have no job id yet.
    ///
    /// `job_ids` is updated in place, also when the pass fails half way.
    pub async fn submit<B: SchedulerBackend>(&mut self, backend: B) -> Result<SubmissionReport> {
        let settings = SubmitSettings::from(&self.file.config);
        let mut orchestrator = Orchestrator::new(backend, settings);
        orchestrator
            .submit(&self.file.dependency, &self.file.jobs, &mut self.file.job_ids)
            .await
    }

    /// Refresh the status registry from the accounting interface.
    pub async fn update_status<A: AccountingBackend>(&mut self, backend: A) -> Vec<StatusRow> {
        let rows = StatusTracker::new(backend).query(&self.file.job_ids).await;
        self.status = StatusRegistry::from_rows(&rows);
        rows
    }

    /// Render the graph, order, job ids and states with `renderer`.
    pub fn render(&self, renderer: &dyn Renderer, rankdir: RankDir) -> Result<String> {
        let graph = self.graph()?;
        let order = graph.topological_order()?;
        let view = GraphView {
            graph: &graph,
            order: &order,
            job_ids: &self.file.job_ids,
            status: &self.status,
            rankdir,
        };
        renderer.render(&view)
    }

    fn all_dependencies(&self) -> DependencyMap {
        let mut all = self.file.dependency.clone();
        for task in self.file.jobs.keys() {
            all.entry(task.clone()).or_default();
        }
        all
    }
}
