//! Task graph builder using petgraph.
//!
//! This module builds directed graphs from task dependency lists so the
//! validator can look for cycles and the scheduler can resolve prerequisites.
//! Dependencies that name unknown tasks never become edges; they are recorded
//! as dangling and the task is simply treated as having an unsatisfiable
//! prerequisite.

use crate::{Error, Result, TaskNodeData};
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{EdgeRef, IntoNodeReferences};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A node in the task graph.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    /// Id of the task.
    pub name: String,
    /// The task data.
    pub task: T,
}

/// A dependency id that does not resolve to any task in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DanglingDependency {
    /// The task declaring the dependency.
    pub task: String,
    /// The id it points at.
    pub dependency: String,
}

/// Task graph for dependency resolution.
///
/// This is a generic graph that can hold any task type implementing [`TaskNodeData`].
/// Edges point from a prerequisite to the task that depends on it.
pub struct TaskGraph<T: TaskNodeData> {
    /// The directed graph of tasks.
    graph: DiGraph<GraphNode<T>, ()>,
    /// Map from task ids to node indices.
    name_to_node: HashMap<String, NodeIndex>,
    /// Dependencies seen by the last `add_dependency_edges` call that matched no task.
    dangling: Vec<DanglingDependency>,
}

impl<T: TaskNodeData> TaskGraph<T> {
    /// Create a new empty task graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_node: HashMap::new(),
            dangling: Vec::new(),
        }
    }

    /// Build a fully wired graph from `(id, task)` pairs.
    ///
    /// Tasks are added in iteration order; a repeated id keeps the first task.
    pub fn from_tasks<S, I>(tasks: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, T)>,
    {
        let mut graph = Self::new();
        for (name, task) in tasks {
            graph.add_task(name.as_ref(), task);
        }
        graph.add_dependency_edges();
        graph
    }

    /// Add a single task to the graph.
    ///
    /// If a task with the same id already exists, returns the existing node index.
    pub fn add_task(&mut self, name: &str, task: T) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(name) {
            return node;
        }

        let node = GraphNode {
            name: name.to_string(),
            task,
        };

        let node_index = self.graph.add_node(node);
        self.name_to_node.insert(name.to_string(), node_index);
        debug!("Added task node '{}'", name);

        node_index
    }

    /// Add dependency edges after all tasks have been added.
    ///
    /// Dependencies naming unknown tasks are not errors; they are collected and
    /// returned so callers can report them. Repeated dependencies produce a
    /// single edge.
    pub fn add_dependency_edges(&mut self) -> &[DanglingDependency] {
        let mut dangling = Vec::new();
        let mut edges_to_add = Vec::new();

        for (node_index, node) in self.graph.node_references() {
            for dep_name in node.task.dependency_names() {
                if let Some(&dep_node_index) = self.name_to_node.get(dep_name) {
                    edges_to_add.push((dep_node_index, node_index));
                } else {
                    dangling.push(DanglingDependency {
                        task: node.name.clone(),
                        dependency: dep_name.to_string(),
                    });
                }
            }
        }

        for (from, to) in edges_to_add {
            self.graph.update_edge(from, to, ());
        }

        if !dangling.is_empty() {
            debug!(count = dangling.len(), "Dependencies reference unknown tasks");
        }
        self.dangling = dangling;
        &self.dangling
    }

    /// Dependencies that did not resolve to a task when edges were last wired.
    #[must_use]
    pub fn dangling_dependencies(&self) -> &[DanglingDependency] {
        &self.dangling
    }

    /// Check if the graph has cycles anywhere.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Get topologically sorted list of tasks, prerequisites first.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains cycles.
    pub fn topological_sort(&self) -> Result<Vec<&GraphNode<T>>> {
        toposort(&self.graph, None)
            .map(|sorted| sorted.into_iter().map(|idx| &self.graph[idx]).collect())
            .map_err(|cycle| Error::TopologicalSortFailed {
                reason: format!(
                    "task '{}' is part of a dependency cycle",
                    self.graph[cycle.node_id()].name
                ),
            })
    }

    /// Find a cycle reachable from `name` by following dependency edges.
    ///
    /// Performs a depth-first walk from the task towards its prerequisites,
    /// keeping the current path on an explicit stack. Returns the cycle members
    /// in path order with the first member repeated at the end, or `None` when
    /// nothing reachable from the task loops back onto the path. Unknown ids
    /// return `None`.
    #[must_use]
    pub fn find_cycle_from(&self, name: &str) -> Option<Vec<String>> {
        let start = self.get_node_index(name)?;

        let mut visited = HashSet::from([start]);
        let mut on_path = HashSet::from([start]);
        let mut path = vec![start];
        let mut stack = vec![(start, self.prerequisite_indices(start))];

        while let Some((_, pending)) = stack.last_mut() {
            if let Some(next) = pending.pop() {
                if on_path.contains(&next) {
                    let begin = path.iter().position(|&idx| idx == next).unwrap_or(0);
                    let mut cycle: Vec<String> = path[begin..]
                        .iter()
                        .map(|&idx| self.graph[idx].name.clone())
                        .collect();
                    cycle.push(self.graph[next].name.clone());
                    return Some(cycle);
                }
                if visited.insert(next) {
                    on_path.insert(next);
                    path.push(next);
                    stack.push((next, self.prerequisite_indices(next)));
                }
            } else if let Some((done, _)) = stack.pop() {
                on_path.remove(&done);
                path.pop();
            }
        }

        None
    }

    /// Every cycle in the graph, as sorted member lists.
    ///
    /// Each strongly connected component with more than one task is a cycle, as
    /// is a task wired to itself. The result is sorted for stable output.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.graph[idx].name.clone())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// All edges as `(prerequisite, dependent)` id pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                self.graph[edge.target()].name.as_str(),
            )
        })
    }

    /// Get the number of tasks in the graph.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if a task exists in the graph.
    #[must_use]
    pub fn contains_task(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    /// Get the node index for a task by id.
    #[must_use]
    pub fn get_node_index(&self, name: &str) -> Option<NodeIndex> {
        self.name_to_node.get(name).copied()
    }

    fn prerequisite_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect()
    }
}

impl<T: TaskNodeData> Default for TaskGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
