//! Core types and scheduling for smartdo
//!
//! smartdo keeps a list of tasks with deadlines, priorities and prerequisite
//! tasks. This crate holds the part of it with actual algorithms:
//!
//! - [`tasks`]: the task model, deadline normalization and dependency
//!   validation (cycle rejection, snapshot audit, graph view)
//! - [`schedule`]: the ready set, urgency scoring, next-task recommendation
//!   and statistics
//! - [`config`]: scoring weights and policies, loaded from TOML
//!
//! Everything is a pure function over an explicit task snapshot and an
//! explicit `now`.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use smartdo_core::tasks::{Priority, Task};
//! use smartdo_core::{recommend, ready_tasks};
//!
//! let now = Utc::now();
//! let tasks = vec![
//!     Task::new("1", Priority::High, now - Duration::hours(2)),
//!     Task::new("2", Priority::Medium, now + Duration::hours(48)).with_dependencies(["1"]),
//! ];
//!
//! assert!(ready_tasks(&tasks).contains("1"));
//! assert_eq!(recommend(&tasks, now).as_deref(), Some("1"));
//! ```

pub mod config;
pub mod error;
pub mod schedule;
pub mod tasks;

pub use config::Config;
pub use error::{Error, Result};
pub use schedule::{
    Reason, Recommendation, Score, Stats, compute_stats, rank, ready_tasks, recommend,
    recommend_next, recommend_next_with, recommend_with, score_task, task_urgency,
};
pub use tasks::{Task, TaskRecord, TaskSet, audit, dependency_view, validate_dependencies};
