//! Snapshots of the task list handed over by the storage layer.

use super::{Task, TaskRecord};
use crate::config::DeadlinePolicy;
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, instrument};

/// The `{"tasks": [...]}` list payload.
#[derive(Deserialize)]
struct Wrapped {
    tasks: Vec<Value>,
}

/// Split a snapshot into raw records. Accepts a bare array or [`Wrapped`].
fn raw_records(content: &str) -> Result<Vec<Value>> {
    let parsed = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Value>>(content)
    } else {
        serde_json::from_str::<Wrapped>(content).map(|wrapped| wrapped.tasks)
    };
    parsed.map_err(|e| Error::serialization(format!("invalid task snapshot: {e}")))
}

/// Decode one record, naming it by id (or position) on failure.
fn decode_record(index: usize, value: Value) -> Result<TaskRecord> {
    let label = match value.get("id").and_then(Value::as_str) {
        Some(id) => format!("'{id}'"),
        None => format!("at index {index}"),
    };
    serde_json::from_value(value)
        .map_err(|e| Error::serialization(format!("invalid task record {label}: {e}")))
}

/// A validated, normalized task list.
///
/// Ids are unique and every deadline is in UTC. Order is preserved from the
/// input; it is the final tie-breaker when recommending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Build a set from already normalized tasks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTask`] if two tasks share an id.
    pub fn new(tasks: Vec<Task>) -> Result<Self> {
        let duplicate = {
            let mut seen = HashSet::with_capacity(tasks.len());
            tasks
                .iter()
                .find(|task| !seen.insert(task.id.as_str()))
                .map(|task| task.id.clone())
        };
        if let Some(id) = duplicate {
            return Err(Error::DuplicateTask { id });
        }
        Ok(Self { tasks })
    }

    /// Normalize storage records.
    ///
    /// # Errors
    ///
    /// Fails on the first record whose deadline or duration is invalid, or on
    /// a duplicate id.
    #[instrument(skip(records), fields(record_count = records.len()))]
    pub fn from_records(records: Vec<TaskRecord>, policy: DeadlinePolicy) -> Result<Self> {
        let tasks = records
            .into_iter()
            .map(|record| Task::try_from_record(record, policy))
            .collect::<Result<Vec<_>>>()?;
        Self::new(tasks)
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON or a record that does
    /// not fit the task shape, otherwise the errors of [`TaskSet::from_records`].
    pub fn from_json_str(content: &str, policy: DeadlinePolicy) -> Result<Self> {
        let records = raw_records(content)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| decode_record(index, value))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = records.len(), "Parsed task snapshot");
        Self::from_records(records, policy)
    }

    /// Read and parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails, otherwise the errors of
    /// [`TaskSet::from_json_str`].
    pub fn from_reader<R: Read>(mut reader: R, policy: DeadlinePolicy) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::io(e, None, "reading task snapshot"))?;
        Self::from_json_str(&content, policy)
    }

    /// The tasks, in input order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Consume the set.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}
