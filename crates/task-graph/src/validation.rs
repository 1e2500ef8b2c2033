//! Validation of dependency edits and whole task graphs.
//!
//! [`validate_dependencies`] is the gate in front of every write that carries a
//! dependency list: it rebuilds the graph with the proposed edges in place of
//! the task's current ones and refuses self-references and cycles.
//! [`TaskGraph::audit`] inspects an existing graph without rejecting anything.

use crate::graph::DanglingDependency;
use crate::{Error, Result, TaskGraph, TaskNodeData};
use tracing::{debug, instrument};

/// How unknown dependency ids are treated by [`validate_dependencies`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownDependencies {
    /// Accept them; the task just never becomes ready until they are fixed.
    #[default]
    Tolerate,
    /// Reject the edit with [`Error::UnknownDependency`].
    Reject,
}

/// Dependency list of a task, detached from the rest of its data.
///
/// Validation only needs the edges, so it copies them into these lightweight
/// nodes instead of cloning whole tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyEdges(Vec<String>);

impl DependencyEdges {
    /// Wrap an explicit dependency list.
    #[must_use]
    pub fn new(dependencies: Vec<String>) -> Self {
        Self(dependencies)
    }

    /// Copy the dependency list of any graph node type.
    pub fn of<T: TaskNodeData>(task: &T) -> Self {
        Self(task.dependency_names().map(String::from).collect())
    }
}

impl TaskNodeData for DependencyEdges {
    fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// An accepted dependency edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validated {
    /// Candidate dependencies that match no task (tolerated policy only).
    pub dangling: Vec<String>,
}

/// Decide whether `candidate` may depend on `dependencies`.
///
/// The graph is built from the existing edges of `tasks`, with `dependencies`
/// substituted as the edge set of `candidate` (its current edges, if any, are
/// ignored). The candidate does not need to exist in `tasks` yet.
///
/// Checks run in order: self-reference (no traversal), unknown ids when the
/// policy rejects them, then a depth-first search from the candidate for a
/// cycle. Unknown ids are terminal nodes for the search.
///
/// # Errors
///
/// - [`Error::InvalidDependency`] if `candidate` appears in `dependencies`
/// - [`Error::UnknownDependency`] for unknown ids under [`UnknownDependencies::Reject`]
/// - [`Error::CircularDependency`] if a cycle is reachable from `candidate`
#[instrument(skip(dependencies, tasks), fields(dependency_count = dependencies.len()))]
pub fn validate_dependencies<'a, T, I>(
    candidate: &str,
    dependencies: &[String],
    tasks: I,
    unknown: UnknownDependencies,
) -> Result<Validated>
where
    T: TaskNodeData + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    if dependencies.iter().any(|dep| dep == candidate) {
        return Err(Error::invalid_dependency(candidate));
    }

    let mut graph = TaskGraph::new();
    graph.add_task(candidate, DependencyEdges::new(dependencies.to_vec()));
    for (name, task) in tasks {
        if name != candidate {
            graph.add_task(name, DependencyEdges::of(task));
        }
    }
    graph.add_dependency_edges();

    let mut dangling: Vec<String> = Vec::new();
    for dep in dependencies {
        if !graph.contains_task(dep) && !dangling.contains(dep) {
            dangling.push(dep.clone());
        }
    }
    if unknown == UnknownDependencies::Reject && !dangling.is_empty() {
        return Err(Error::unknown_dependency(candidate, dangling));
    }

    if let Some(cycle) = graph.find_cycle_from(candidate) {
        debug!(cycle = %cycle.join(" -> "), "Rejected dependency edit");
        return Err(Error::circular(candidate, cycle));
    }

    Ok(Validated { dangling })
}

/// Findings from auditing an existing graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Every cycle, as sorted member lists.
    pub cycles: Vec<Vec<String>>,
    /// Every dependency that names an unknown task.
    pub dangling: Vec<DanglingDependency>,
}

impl AuditReport {
    /// Whether the graph is acyclic. Dangling dependencies do not invalidate it.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cycles.is_empty()
    }
}

impl<T: TaskNodeData> TaskGraph<T> {
    /// Audit the graph structure.
    ///
    /// Reports every cycle and every dangling dependency. Use this on data
    /// that may have bypassed [`validate_dependencies`]; it never fails.
    #[must_use]
    pub fn audit(&self) -> AuditReport {
        AuditReport {
            cycles: self.cycles(),
            dangling: self.dangling_dependencies().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(deps: &[&str]) -> DependencyEdges {
        DependencyEdges::new(deps.iter().map(|s| (*s).to_string()).collect())
    }

    fn names(deps: &[&str]) -> Vec<String> {
        deps.iter().map(|s| (*s).to_string()).collect()
    }

    fn validate(
        candidate: &str,
        deps: &[&str],
        tasks: &[(&str, DependencyEdges)],
    ) -> Result<Validated> {
        validate_dependencies(
            candidate,
            &names(deps),
            tasks.iter().map(|(name, task)| (*name, task)),
            UnknownDependencies::Tolerate,
        )
    }

    fn chain() -> Vec<(&'static str, DependencyEdges)> {
        vec![("a", edges(&[])), ("b", edges(&["a"])), ("c", edges(&["b"]))]
    }

    #[test]
    fn test_self_dependency_rejected() {
        let err = validate("a", &["b", "a"], &chain()).unwrap_err();
        assert_eq!(err, Error::invalid_dependency("a"));
    }

    #[test]
    fn test_self_dependency_rejected_on_empty_graph() {
        let err = validate("new", &["new"], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidDependency { task } if task == "new"));
    }

    #[test]
    fn test_new_task_on_chain_accepted() {
        let verdict = validate("d", &["c"], &chain()).unwrap();
        assert!(verdict.dangling.is_empty());
    }

    #[test]
    fn test_update_closing_loop_rejected() {
        let mut tasks = chain();
        validate("d", &["c"], &tasks).unwrap();
        tasks.push(("d", edges(&["c"])));

        let err = validate("a", &["d"], &tasks).unwrap_err();
        assert_eq!(
            err,
            Error::circular("a", names(&["a", "d", "c", "b", "a"]))
        );
    }

    #[test]
    fn test_candidate_edges_replace_existing() {
        // "b" currently depends on "c", which would loop with c -> b.
        let tasks = vec![("b", edges(&["c"])), ("c", edges(&["b"]))];
        let err = validate("c", &["b"], &tasks).unwrap_err();
        assert!(matches!(err, Error::CircularDependency { .. }));

        // Replacing c's edges with nothing breaks the loop.
        assert!(validate("c", &[], &tasks).is_ok());
    }

    #[test]
    fn test_unknown_dependency_tolerated() {
        let verdict = validate("d", &["ghost", "c", "ghost"], &chain()).unwrap();
        assert_eq!(verdict.dangling, names(&["ghost"]));
    }

    #[test]
    fn test_unknown_dependency_rejected_when_strict() {
        let tasks = chain();
        let err = validate_dependencies(
            "d",
            &names(&["ghost"]),
            tasks.iter().map(|(name, task)| (*name, task)),
            UnknownDependencies::Reject,
        )
        .unwrap_err();
        assert_eq!(err, Error::unknown_dependency("d", names(&["ghost"])));
    }

    #[test]
    fn test_existing_cycle_unreachable_from_candidate_accepted() {
        let tasks = vec![("x", edges(&["y"])), ("y", edges(&["x"])), ("a", edges(&[]))];
        assert!(validate("b", &["a"], &tasks).is_ok());
        assert!(validate("b", &["x"], &tasks).is_err());
    }

    #[test]
    fn test_audit_reports_cycles_and_dangling() {
        let graph = TaskGraph::from_tasks(vec![
            ("a", edges(&["b"])),
            ("b", edges(&["a"])),
            ("c", edges(&["ghost"])),
        ]);

        let report = graph.audit();
        assert!(!report.is_valid());
        assert_eq!(report.cycles, vec![names(&["a", "b"])]);
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.dangling[0].dependency, "ghost");
    }

    #[test]
    fn test_audit_valid_graph() {
        let graph = TaskGraph::from_tasks(chain());
        let report = graph.audit();
        assert!(report.is_valid());
        assert!(report.dangling.is_empty());
    }
}
