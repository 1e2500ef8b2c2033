//! Ready-set computation.

use crate::tasks::{Status, Task};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Ids of every task that can be started now.
///
/// A task is ready when it is not completed and each of its dependencies
/// names a completed task. Unknown dependency ids keep a task blocked.
#[must_use]
#[instrument(skip_all, fields(task_count = tasks.len()))]
pub fn ready_tasks(tasks: &[Task]) -> BTreeSet<String> {
    ready_in_order(tasks)
        .into_iter()
        .map(|task| task.id.clone())
        .collect()
}

/// The ready tasks, in input order.
///
/// When ids repeat, dependents see the status of the first task with that id,
/// matching the dependency graph.
#[must_use]
pub fn ready_in_order(tasks: &[Task]) -> Vec<&Task> {
    let mut status: HashMap<&str, Status> = HashMap::with_capacity(tasks.len());
    for task in tasks {
        status.entry(task.id.as_str()).or_insert(task.status);
    }

    let ready: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.is_completed())
        .filter(|task| {
            task.dependencies
                .iter()
                .all(|dep| status.get(dep.as_str()) == Some(&Status::Completed))
        })
        .collect();

    debug!(ready = ready.len(), "Computed ready set");
    ready
}
