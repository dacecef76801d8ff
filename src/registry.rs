// src/registry.rs

//! Job and status registries.
//!
//! [`JobRegistry`] remembers which scheduler job id every submitted task got.
//! It keeps insertion order (which is submission order during a pass), also
//! through the `[job_ids]` table of a saved suite file, and is append-only:
//! once a task has an id it is never revised.
//!
//! [`StatusRegistry`] is the last observed scheduler state per task and is
//! rebuilt wholesale on every status query.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{JobId, TaskName};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRegistry {
    entries: Vec<(TaskName, JobId)>,
    index: HashMap<TaskName, usize>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the job id of a task.
    ///
    /// Returns `false` (and leaves the registry untouched) if the task already
    /// has an id.
    pub fn record(&mut self, task: impl Into<TaskName>, job_id: impl Into<JobId>) -> bool {
        let task = task.into();
        if self.index.contains_key(&task) {
            return false;
        }
        self.index.insert(task.clone(), self.entries.len());
        self.entries.push((task, job_id.into()));
        true
    }

    pub fn get(&self, task: &str) -> Option<&str> {
        self.index
            .get(task)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, task: &str) -> bool {
        self.index.contains_key(task)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(task, job_id)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(task, id)| (task.as_str(), id.as_str()))
    }

    /// Job ids in insertion order.
    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, id)| id.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for JobRegistry
where
    K: Into<TaskName>,
    V: Into<JobId>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = JobRegistry::new();
        for (task, id) in iter {
            registry.record(task, id);
        }
        registry
    }
}

impl Serialize for JobRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (task, id) in &self.entries {
            map.serialize_entry(task, id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JobRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = JobRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table mapping task names to job ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut registry = JobRegistry::new();
                while let Some((task, id)) = access.next_entry::<String, String>()? {
                    registry.record(task, id);
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

/// One row of a status query: `(task, job_id, state)`.
///
/// `state` is `None` when the accounting interface did not report the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub task: TaskName,
    pub job_id: JobId,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRegistry {
    states: BTreeMap<TaskName, Option<String>>,
}

impl StatusRegistry {
    pub fn from_rows(rows: &[StatusRow]) -> Self {
        let states = rows
            .iter()
            .map(|row| (row.task.clone(), row.state.clone()))
            .collect();
        Self { states }
    }

    pub fn state_of(&self, task: &str) -> Option<&str> {
        self.states.get(task).and_then(|s| s.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
