//! Task list statistics.

use super::ready::ready_in_order;
use crate::tasks::{Priority, Status, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

/// Counters over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of tasks
    pub total: usize,
    /// Tasks not started
    pub pending: usize,
    /// Tasks being worked on
    pub in_progress: usize,
    /// Finished tasks
    pub completed: usize,
    /// Unfinished tasks whose deadline is strictly before `now`
    pub overdue: usize,
    /// Size of the ready set
    pub ready: usize,
    /// Unfinished high priority tasks
    pub high_priority_pending: usize,
}

/// Compute statistics at `now`.
#[must_use]
#[instrument(skip(tasks), fields(task_count = tasks.len()))]
pub fn compute_stats(tasks: &[Task], now: DateTime<Utc>) -> Stats {
    let mut stats = tasks.iter().fold(
        Stats {
            total: tasks.len(),
            ..Stats::default()
        },
        |mut stats, task| {
            match task.status {
                Status::Pending => stats.pending += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Completed => stats.completed += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            if !task.is_completed() && task.priority == Priority::High {
                stats.high_priority_pending += 1;
            }
            stats
        },
    );
    stats.ready = ready_in_order(tasks).len();
    stats
}
