//! Command execution
//!
//! Each command loads the configuration and the task snapshot, calls into
//! `smartdo-core` and returns the JSON document to print.

use crate::cli::{CliError, Commands, EXIT_OK, EXIT_REJECTED};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use smartdo_core::{Config, TaskSet};
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, instrument};

/// Everything a command needs: configuration, snapshot and the reference instant.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// Parsed task snapshot
    pub tasks: TaskSet,
    /// Instant used for scoring and overdue checks
    pub now: DateTime<Utc>,
}

impl CommandContext {
    /// Load the configuration file (if any) and the snapshot.
    ///
    /// `tasks` is a file path, or `-` to read from `stdin`.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError::Config`] if either input cannot be read or parsed.
    pub fn load(
        config_path: Option<&Path>,
        tasks: &str,
        now: Option<DateTime<Utc>>,
        stdin: impl Read,
    ) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let policy = config.deadlines.naive;
        let tasks = if tasks == "-" {
            TaskSet::from_reader(stdin, policy)?
        } else {
            let content = std::fs::read_to_string(tasks).map_err(|e| {
                CliError::config_with_help(
                    format!("Failed to read task snapshot {tasks}: {e}"),
                    "Pass --tasks <file>, or '-' to read the snapshot from stdin",
                )
            })?;
            TaskSet::from_json_str(&content, policy)?
        };
        debug!(count = tasks.len(), "Loaded task snapshot");

        Ok(Self {
            config,
            tasks,
            now: now.unwrap_or_else(Utc::now),
        })
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Document to print on stdout
    pub output: Value,
    /// Process exit code
    pub exit_code: i32,
}

impl Outcome {
    fn ok(output: impl Serialize) -> Result<Self, CliError> {
        Self::with_code(output, EXIT_OK)
    }

    fn with_code(output: impl Serialize, exit_code: i32) -> Result<Self, CliError> {
        let output = serde_json::to_value(output)
            .map_err(|e| CliError::other(format!("Failed to serialize output: {e}")))?;
        Ok(Self { output, exit_code })
    }
}

#[derive(Serialize)]
struct ValidationOutput {
    valid: bool,
    dangling: Vec<String>,
}

/// Run one command against a loaded context.
///
/// # Errors
///
/// Returns [`CliError::Rejected`] when `validate` refuses the edit, or
/// [`CliError::Other`] if the output cannot be serialized.
#[instrument(skip(ctx), fields(task_count = ctx.tasks.len()))]
pub fn execute(command: &Commands, ctx: &CommandContext) -> Result<Outcome, CliError> {
    let tasks = ctx.tasks.tasks();
    match command {
        Commands::Validate { task, deps } => {
            let validated = smartdo_core::validate_dependencies(
                task,
                deps,
                tasks,
                ctx.config.dependencies.unknown,
            )?;
            Outcome::ok(ValidationOutput {
                valid: true,
                dangling: validated.dangling,
            })
        }
        Commands::Ready => Outcome::ok(smartdo_core::ready_tasks(tasks)),
        Commands::Next => Outcome::ok(smartdo_core::recommend_next_with(
            tasks,
            ctx.now,
            &ctx.config.scoring,
        )),
        Commands::Rank { limit } => Outcome::ok(smartdo_core::rank(
            tasks,
            ctx.now,
            &ctx.config,
            limit.map(NonZeroUsize::get),
        )),
        Commands::Stats => Outcome::ok(smartdo_core::compute_stats(tasks, ctx.now)),
        Commands::Graph => Outcome::ok(smartdo_core::dependency_view(tasks)),
        Commands::Audit => {
            let report = smartdo_core::audit(tasks);
            let code = if report.is_acyclic() {
                EXIT_OK
            } else {
                tracing::warn!(cycles = report.cycles.len(), "Snapshot contains cycles");
                EXIT_REJECTED
            };
            Outcome::with_code(report, code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use smartdo_core::tasks::{Priority, Status, Task};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn context(tasks: Vec<Task>) -> CommandContext {
        CommandContext {
            config: Config::default(),
            tasks: TaskSet::new(tasks).unwrap(),
            now: now(),
        }
    }

    fn chain() -> Vec<Task> {
        vec![
            Task::new("A", Priority::Low, now()).with_status(Status::Completed),
            Task::new("B", Priority::High, now()).with_dependencies(["A"]),
            Task::new("C", Priority::Medium, now()).with_dependencies(["B"]),
        ]
    }

    #[test]
    fn test_validate_accepts() {
        let ctx = context(chain());
        let cmd = Commands::Validate {
            task: "D".to_string(),
            deps: vec!["C".to_string(), "ghost".to_string()],
        };
        let outcome = execute(&cmd, &ctx).unwrap();
        assert_eq!(outcome.exit_code, EXIT_OK);
        assert_eq!(
            outcome.output,
            serde_json::json!({"valid": true, "dangling": ["ghost"]})
        );
    }

    #[test]
    fn test_validate_rejects_cycle() {
        let ctx = context(chain());
        let cmd = Commands::Validate {
            task: "A".to_string(),
            deps: vec!["C".to_string()],
        };
        let err = execute(&cmd, &ctx).unwrap_err();
        assert!(matches!(err, CliError::Rejected { .. }));
        assert_eq!(err.to_string(), "Circular dependency detected: A -> C -> B -> A");
    }

    #[test]
    fn test_ready_and_next() {
        let ctx = context(chain());
        let ready = execute(&Commands::Ready, &ctx).unwrap();
        assert_eq!(ready.output, serde_json::json!(["B"]));

        let next = execute(&Commands::Next, &ctx).unwrap();
        assert_eq!(next.output["id"], "B");
    }

    #[test]
    fn test_rank_respects_limit() {
        let tasks = vec![
            Task::new("A", Priority::Low, now()),
            Task::new("B", Priority::High, now()),
        ];
        let ctx = context(tasks);
        let ranked = execute(
            &Commands::Rank {
                limit: NonZeroUsize::new(1),
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(ranked.output.as_array().map(Vec::len), Some(1));
        assert_eq!(ranked.output[0]["taskId"], "B");
    }

    #[test]
    fn test_next_is_null_when_nothing_ready() {
        let ctx = context(Vec::new());
        let next = execute(&Commands::Next, &ctx).unwrap();
        assert_eq!(next.output, Value::Null);
    }

    #[test]
    fn test_audit_exit_code() {
        let cyclic = vec![
            Task::new("X", Priority::Low, now()).with_dependencies(["Y"]),
            Task::new("Y", Priority::Low, now()).with_dependencies(["X"]),
        ];
        let outcome = execute(&Commands::Audit, &context(cyclic)).unwrap();
        assert_eq!(outcome.exit_code, EXIT_REJECTED);
        assert_eq!(outcome.output["cycles"], serde_json::json!([["X", "Y"]]));

        let clean = execute(&Commands::Audit, &context(chain())).unwrap();
        assert_eq!(clean.exit_code, EXIT_OK);
    }

    #[test]
    fn test_load_from_reader() {
        let json = r#"[{"id":"1","deadline":"2024-05-01T10:00:00Z","priority":"high","duration":30}]"#;
        let ctx = CommandContext::load(None, "-", Some(now()), json.as_bytes()).unwrap();
        assert_eq!(ctx.tasks.len(), 1);
        assert_eq!(ctx.now, now());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CommandContext::load(None, "/nonexistent/tasks.json", None, std::io::empty())
            .unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
