//! Error types for smartdo-core

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for smartdo-core operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A dependency edit was rejected by the graph validator
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] smartdo_task_graph::Error),

    /// A deadline could not be interpreted as a point in time
    #[error("Task '{task}' has an invalid deadline: '{value}'")]
    #[diagnostic(
        code(smartdo::task::invalid_deadline),
        help("Use an ISO-8601 timestamp such as 2024-05-01T17:00:00Z")
    )]
    InvalidDeadline {
        /// Id of the task carrying the deadline
        task: String,
        /// The raw value that failed to parse
        value: String,
    },

    /// A deadline had no timezone while naive deadlines are refused
    #[error("Task '{task}' has a deadline without timezone: '{value}'")]
    #[diagnostic(
        code(smartdo::task::naive_deadline),
        help("Add an explicit offset (e.g. 'Z' or '+02:00'), or set deadlines.naive = \"assume-utc\"")
    )]
    NaiveDeadline {
        /// Id of the task carrying the deadline
        task: String,
        /// The raw value
        value: String,
    },

    /// A task declared a zero duration
    #[error("Task '{task}' must have a positive duration")]
    #[diagnostic(code(smartdo::task::invalid_duration))]
    InvalidDuration {
        /// Id of the offending task
        task: String,
    },

    /// Two records share the same id
    #[error("Duplicate task id '{id}'")]
    #[diagnostic(
        code(smartdo::task::duplicate),
        help("Task ids must be unique within a snapshot")
    )]
    DuplicateTask {
        /// The repeated id
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(smartdo::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(smartdo::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(code(smartdo::serialization))]
    Serialization {
        /// The error message describing the serialization issue
        message: String,
    },
}

impl Error {
    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(PathBuf::into_boxed_path),
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether the error rejects a dependency edit (self-reference, cycle, unknown id).
    ///
    /// Callers map these to a rejected write rather than an internal failure.
    #[must_use]
    pub fn is_rejected_edit(&self) -> bool {
        matches!(self, Self::Graph(inner) if inner.is_rejection())
    }
}

/// Result type for smartdo-core operations
pub type Result<T> = std::result::Result<T, Error>;
