//! Dependency graph over the task list.
//!
//! Wraps the generic `smartdo_task_graph` crate with smartdo task types: the
//! validator run before persisting a dependency edit, the audit of an
//! existing snapshot, and the node/edge view served to the frontend.

use super::Task;
use crate::Result;
use crate::config::DependencyPolicy;
use crate::schedule::ready_in_order;
use serde::Serialize;
use smartdo_task_graph::{TaskGraph, Validated};
use tracing::{instrument, warn};

/// Build the dependency graph of a task list, borrowing the tasks.
///
/// Used by the audit and the graph view. A repeated id keeps the first task.
pub(crate) fn build_graph(tasks: &[Task]) -> TaskGraph<&Task> {
    TaskGraph::from_tasks(tasks.iter().map(|task| (task.id.as_str(), task)))
}

/// Decide whether `task_id` may depend on `dependencies`.
///
/// `tasks` is the current list, before the edit. The task does not need to
/// exist yet. Dangling ids are accepted under [`DependencyPolicy::Tolerate`]
/// and reported in the returned [`Validated`].
///
/// # Errors
///
/// Returns [`crate::Error::Graph`] wrapping `InvalidDependency` (self
/// reference), `UnknownDependency` (dangling ids under
/// [`DependencyPolicy::Reject`]) or `CircularDependency`.
#[instrument(skip(dependencies, tasks), fields(task_count = tasks.len()))]
pub fn validate_dependencies(
    task_id: &str,
    dependencies: &[String],
    tasks: &[Task],
    policy: DependencyPolicy,
) -> Result<Validated> {
    let validated = smartdo_task_graph::validate_dependencies(
        task_id,
        dependencies,
        tasks.iter().map(|task| (task.id.as_str(), task)),
        policy.into(),
    )?;

    if !validated.dangling.is_empty() {
        warn!(
            task = task_id,
            dangling = ?validated.dangling,
            "Accepted dependencies on unknown tasks; the task stays blocked until they exist"
        );
    }

    Ok(validated)
}

/// A dependency that names no task in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// The task declaring the dependency
    pub task: String,
    /// The unknown id
    pub dependency: String,
}

/// Structural problems found in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Audit {
    /// Every cycle, as sorted member lists
    pub cycles: Vec<Vec<String>>,
    /// Every dangling dependency, in task order
    pub dangling: Vec<DanglingReference>,
}

impl Audit {
    /// Whether the snapshot is acyclic.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Audit a snapshot that may not have gone through validation.
#[must_use]
#[instrument(skip_all, fields(task_count = tasks.len()))]
pub fn audit(tasks: &[Task]) -> Audit {
    let report = build_graph(tasks).audit();
    Audit {
        cycles: report.cycles,
        dangling: report
            .dangling
            .into_iter()
            .map(|d| DanglingReference {
                task: d.task,
                dependency: d.dependency,
            })
            .collect(),
    }
}

/// One dependency edge, pointing from the prerequisite to its dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Prerequisite id
    pub from: String,
    /// Dependent id
    pub to: String,
}

/// Node/edge payload for graph visualization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView<'a> {
    /// Tasks, prerequisites first when the snapshot is acyclic
    pub nodes: Vec<&'a Task>,
    /// One edge per declared dependency, dangling ones included
    pub edges: Vec<Edge>,
    /// Ids of ready tasks, in input order
    pub ready_tasks: Vec<String>,
}

/// Build the visualization payload for a snapshot.
#[must_use]
#[instrument(skip_all, fields(task_count = tasks.len()))]
pub fn dependency_view(tasks: &[Task]) -> GraphView<'_> {
    let graph = build_graph(tasks);

    let nodes = match graph.topological_sort() {
        Ok(sorted) => sorted.into_iter().map(|node| node.task).collect(),
        Err(_) => tasks.iter().collect(),
    };

    let edges = tasks
        .iter()
        .flat_map(|task| {
            task.dependencies.iter().map(|dep| Edge {
                from: dep.clone(),
                to: task.id.clone(),
            })
        })
        .collect();

    let ready_tasks = ready_in_order(tasks)
        .into_iter()
        .map(|task| task.id.clone())
        .collect();

    GraphView {
        nodes,
        edges,
        ready_tasks,
    }
}
