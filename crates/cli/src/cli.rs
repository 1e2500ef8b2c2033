use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Operational failure exit code (bad input, unreadable files)
pub const EXIT_FAILURE: i32 = 1;
/// A dependency edit was rejected, or an audit found cycles
pub const EXIT_REJECTED: i32 = 2;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Configuration or input error (exit code 1)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(smartdo::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// The dependency edit was refused (exit code 2)
    #[error("{message}")]
    #[diagnostic(code(smartdo::cli::rejected))]
    Rejected {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 1)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(smartdo::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Machine-readable category used in the JSON error envelope.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Rejected { .. } => "rejected",
            Self::Other { .. } => "other",
        }
    }
}

/// Convert `smartdo_core::Error` to the matching `CliError` variant.
impl From<smartdo_core::Error> for CliError {
    fn from(err: smartdo_core::Error) -> Self {
        if err.is_rejected_edit() {
            let help = err.help().map(|h| h.to_string());
            return Self::Rejected {
                message: err.to_string(),
                help,
            };
        }
        match err {
            // Avoid "Configuration error: Configuration error:"
            smartdo_core::Error::Configuration { message } => Self::config(message),
            smartdo_core::Error::Io {
                source,
                path,
                operation,
            } => {
                let path_str = path
                    .as_ref()
                    .map_or(String::new(), |p| format!(" on {}", p.display()));
                Self::config_with_help(
                    format!("I/O {operation} failed{path_str}: {source}"),
                    "Check file permissions and ensure the path exists",
                )
            }
            smartdo_core::Error::InvalidDeadline { .. }
            | smartdo_core::Error::NaiveDeadline { .. }
            | smartdo_core::Error::InvalidDuration { .. }
            | smartdo_core::Error::DuplicateTask { .. }
            | smartdo_core::Error::Serialization { .. } => {
                let help = err.help().map(|h| h.to_string());
                Self::Config {
                    message: err.to_string(),
                    help,
                }
            }
            smartdo_core::Error::Graph(_) => Self::other(err.to_string()),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Rejected { .. } => EXIT_REJECTED,
        CliError::Config { .. } | CliError::Other { .. } => EXIT_FAILURE,
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let envelope = ErrorEnvelope::new(serde_json::json!({
            "code": err.category(),
            "message": err.to_string(),
        }));
        match serde_json::to_string(&envelope) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
    }
    let _ = io::stderr().flush();
}

/// Task dependency validation and next-task recommendation.
#[derive(Parser, Debug)]
#[command(name = "smartdo")]
#[command(about = "Validate task dependencies and recommend what to work on next")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    /// Log line format.
    #[arg(
        long,
        global = true,
        value_enum,
        help = "Log line format (defaults to json under --json, compact otherwise)"
    )]
    pub log_format: Option<crate::tracing::TracingFormat>,

    /// Emit JSON log lines and JSON error envelopes.
    #[arg(long, global = true, help = "Output logs and errors in JSON format")]
    pub json: bool,

    /// Configuration file.
    #[arg(
        long,
        global = true,
        env = "SMARTDO_CONFIG",
        help = "Path to a smartdo TOML configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Task snapshot to read.
    #[arg(
        long,
        short = 't',
        global = true,
        default_value = "-",
        help = "JSON task snapshot to read ('-' for stdin)"
    )]
    pub tasks: String,

    /// Reference instant for scoring and overdue checks.
    #[arg(
        long,
        global = true,
        help = "Evaluate as of this RFC 3339 instant instead of the current time"
    )]
    pub now: Option<DateTime<Utc>>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check whether a dependency edit is allowed.
    #[command(about = "Check whether a task may depend on the given tasks")]
    Validate {
        /// Task being created or updated.
        #[arg(long, help = "Id of the task being created or updated")]
        task: String,
        /// Its proposed dependency list.
        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated ids of its proposed dependencies"
        )]
        deps: Vec<String>,
    },
    /// List the ready tasks.
    #[command(about = "List tasks whose prerequisites are all completed")]
    Ready,
    /// Print the recommended next task.
    #[command(about = "Print the single task to work on next")]
    Next,
    /// Print ranked recommendations.
    #[command(about = "Rank ready tasks with scores and reasons")]
    Rank {
        /// Maximum number of entries.
        #[arg(long, help = "Maximum number of recommendations (defaults to the configured limit)")]
        limit: Option<NonZeroUsize>,
    },
    /// Print task statistics.
    #[command(about = "Print task counters")]
    Stats,
    /// Print the dependency graph.
    #[command(about = "Print the dependency graph as nodes and edges")]
    Graph,
    /// Report cycles and dangling dependencies.
    #[command(about = "Report cycles and dangling dependencies in the snapshot")]
    Audit,
}

impl Commands {
    /// Command name used in spans and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Validate { .. } => "validate",
            Self::Ready => "ready",
            Self::Next => "next",
            Self::Rank { .. } => "rank",
            Self::Stats => "stats",
            Self::Graph => "graph",
            Self::Audit => "audit",
        }
    }
}

/// Parse the process arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
