//! Urgency and priority scoring.

use crate::config::ScoringConfig;
use crate::tasks::Task;
use chrono::{DateTime, Utc};
use serde::Serialize;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Breakdown of a task's score at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Fractional hours until the deadline; negative once overdue
    pub hours_until_deadline: f64,
    /// `max(0, horizon - hours_until_deadline)`
    pub urgency: f64,
    /// Priority weight applied to the urgency
    pub weight: f64,
    /// `urgency * weight`
    pub value: f64,
}

/// Fractional hours from `now` until `deadline`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn hours_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (deadline - now).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Score a task at `now`.
#[must_use]
pub fn score_task(task: &Task, now: DateTime<Utc>, config: &ScoringConfig) -> Score {
    let hours_until_deadline = hours_until(task.deadline, now);
    let urgency = (config.urgency_horizon_hours - hours_until_deadline).max(0.0);
    let weight = config.priority_weights.weight(task.priority);
    Score {
        hours_until_deadline,
        urgency,
        weight,
        value: urgency * weight,
    }
}

/// Score one task by id, whether or not it is ready.
///
/// Returns `None` if no task has that id.
#[must_use]
pub fn task_urgency(
    task_id: &str,
    tasks: &[Task],
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> Option<Score> {
    tasks
        .iter()
        .find(|task| task.id == task_id)
        .map(|task| score_task(task, now, config))
}
