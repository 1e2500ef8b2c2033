//! Task model
//!
//! [`TaskRecord`] is the shape the storage layer hands over (the REST task
//! payload); [`Task`] is the normalized form every scheduling operation works
//! on, with its deadline pinned to UTC.

mod deadline;
pub mod graph;
mod snapshot;

pub use deadline::parse_deadline;
pub use graph::{
    Audit, DanglingReference, Edge, GraphView, audit, dependency_view, validate_dependencies,
};
pub use snapshot::TaskSet;

use crate::config::DeadlinePolicy;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use smartdo_task_graph::TaskNodeData;
use std::fmt;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Not started
    #[default]
    Pending,
    /// Being worked on
    InProgress,
    /// Done; satisfies dependents
    Completed,
}

impl Status {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importance of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Weighted 3 by default
    High,
    /// Weighted 2 by default
    Medium,
    /// Weighted 1 by default
    Low,
}

impl Priority {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as scheduled by smartdo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique id
    pub id: String,
    /// Display title
    pub title: String,
    /// Lifecycle state
    pub status: Status,
    /// Importance
    pub priority: Priority,
    /// Absolute deadline
    pub deadline: DateTime<Utc>,
    /// Estimated effort in minutes
    pub duration: u32,
    /// Ids of tasks that must be completed first
    pub dependencies: Vec<String>,
    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    /// Create a pending task with no dependencies and a one hour duration.
    pub fn new(id: impl Into<String>, priority: Priority, deadline: DateTime<Utc>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            status: Status::Pending,
            priority,
            deadline,
            duration: 60,
            dependencies: Vec::new(),
            description: None,
            notes: None,
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the duration in minutes.
    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = minutes;
        self
    }

    /// Set the dependency ids.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the task has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Whether the task is unfinished and its deadline is strictly before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.deadline < now
    }

    /// Normalize a storage record.
    ///
    /// # Errors
    ///
    /// Fails if the deadline cannot be parsed (or is naive under
    /// [`DeadlinePolicy::Reject`]) or the duration is zero.
    pub fn try_from_record(record: TaskRecord, policy: DeadlinePolicy) -> Result<Self> {
        let deadline = parse_deadline(&record.id, &record.deadline, policy)?;
        if record.duration == 0 {
            return Err(Error::InvalidDuration { task: record.id });
        }

        Ok(Self {
            id: record.id,
            title: record.title,
            status: record.status,
            priority: record.priority,
            deadline,
            duration: record.duration,
            dependencies: record.dependencies,
            description: record.description,
            notes: record.notes,
        })
    }
}

impl TaskNodeData for Task {
    fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }
}

/// A task as stored and served by the REST layer.
///
/// Field names follow the frontend's camelCase task payload; bookkeeping
/// fields such as `createdAt` are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Unique id
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 deadline, with or without offset
    pub deadline: String,
    /// Importance
    pub priority: Priority,
    /// Estimated effort in minutes
    pub duration: u32,
    /// Lifecycle state
    #[serde(default)]
    pub status: Status,
    /// Ids of prerequisite tasks
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: Vec<String>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Older rows store `null` instead of an empty dependency list.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
