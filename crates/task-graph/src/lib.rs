//! Task dependency DAG algorithms for smartdo.
//!
//! This crate provides a directed graph of task prerequisites built on
//! petgraph, the validation that keeps that graph acyclic, and the queries the
//! scheduler needs on top of it.
//!
//! An edge `A -> B` means "B depends on A": A must complete before B is ready.
//! Graphs are cheap to build and are meant to be rebuilt from the current task
//! list on every call; nothing here is persisted.
//!
//! # Key Types
//!
//! - [`TaskGraph`]: the graph structure for building and querying task dependencies
//! - [`TaskNodeData`]: trait that task types implement to be stored in the graph
//! - [`validate_dependencies`]: decides whether a proposed dependency list is acceptable
//!
//! # Example
//!
//! ```ignore
//! use smartdo_task_graph::{TaskGraph, TaskNodeData, validate_dependencies, UnknownDependencies};
//!
//! struct MyTask {
//!     dependencies: Vec<String>,
//! }
//!
//! impl TaskNodeData for MyTask {
//!     fn dependency_names(&self) -> impl Iterator<Item = &str> {
//!         self.dependencies.iter().map(String::as_str)
//!     }
//! }
//!
//! let tasks = vec![
//!     ("a".to_string(), MyTask { dependencies: vec![] }),
//!     ("b".to_string(), MyTask { dependencies: vec!["a".to_string()] }),
//! ];
//!
//! // Would making "a" depend on "b" close a loop?
//! let verdict = validate_dependencies(
//!     "a",
//!     &["b".to_string()],
//!     tasks.iter().map(|(name, task)| (name.as_str(), task)),
//!     UnknownDependencies::Tolerate,
//! );
//! assert!(verdict.is_err());
//! ```

mod error;
mod graph;
mod validation;

pub use error::{Error, Result};
pub use graph::{DanglingDependency, GraphNode, TaskGraph};
pub use validation::{
    AuditReport, DependencyEdges, UnknownDependencies, Validated, validate_dependencies,
};

/// Trait for task data that can be stored in the task graph.
///
/// Implement this trait for your task type to enable it to be stored
/// in a [`TaskGraph`] and participate in dependency resolution.
pub trait TaskNodeData: Clone {
    /// Returns the names of tasks this task depends on, in declaration order.
    fn dependency_names(&self) -> impl Iterator<Item = &str>;
}

/// Graphs can borrow their tasks instead of owning clones.
impl<T: TaskNodeData> TaskNodeData for &T {
    fn dependency_names(&self) -> impl Iterator<Item = &str> {
        (**self).dependency_names()
    }
}
