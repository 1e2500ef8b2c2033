//! Error types for task graph operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for task graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or ordering a task graph.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum Error {
    /// A task lists itself among its own dependencies.
    #[error("Task '{task}' cannot depend on itself")]
    #[diagnostic(
        code(smartdo::graph::invalid_dependency),
        help("Remove '{task}' from its own dependency list")
    )]
    InvalidDependency {
        /// The offending task.
        task: String,
    },

    /// The edit would close a loop in the dependency graph.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(smartdo::graph::circular_dependency),
        help("Task '{task}' would transitively depend on itself; drop one of the edges in the cycle")
    )]
    CircularDependency {
        /// The task whose dependency list was being validated.
        task: String,
        /// Cycle members in path order, first member repeated at the end.
        cycle: Vec<String>,
    },

    /// Dependencies reference tasks that do not exist (strict policy only).
    #[error("Task '{task}' depends on unknown task(s): {}", .missing.join(", "))]
    #[diagnostic(
        code(smartdo::graph::unknown_dependency),
        help("Create the referenced tasks first or remove them from the dependency list")
    )]
    UnknownDependency {
        /// The task whose dependency list was being validated.
        task: String,
        /// Dependency ids with no matching task.
        missing: Vec<String>,
    },

    /// Failed to perform topological sort.
    #[error("Failed to sort tasks topologically: {reason}")]
    #[diagnostic(code(smartdo::graph::toposort))]
    TopologicalSortFailed {
        /// Reason for the failure.
        reason: String,
    },
}

impl Error {
    /// Create an invalid (self-referencing) dependency error.
    pub fn invalid_dependency(task: impl Into<String>) -> Self {
        Self::InvalidDependency { task: task.into() }
    }

    /// Create a circular dependency error.
    pub fn circular(task: impl Into<String>, cycle: Vec<String>) -> Self {
        Self::CircularDependency {
            task: task.into(),
            cycle,
        }
    }

    /// Create an unknown dependency error.
    pub fn unknown_dependency(task: impl Into<String>, missing: Vec<String>) -> Self {
        Self::UnknownDependency {
            task: task.into(),
            missing,
        }
    }

    /// Whether this error rejects a dependency edit (as opposed to a sort failure).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidDependency { .. }
                | Self::CircularDependency { .. }
                | Self::UnknownDependency { .. }
        )
    }
}
