//! Scheduling over a task snapshot
//!
//! Every function here is pure: the task list and the current instant are
//! passed in, nothing is cached between calls.

mod ready;
mod recommend;
mod score;
mod stats;

pub use ready::{ready_in_order, ready_tasks};
pub use recommend::{
    Reason, Recommendation, rank, recommend, recommend_next, recommend_next_with, recommend_with,
};
pub use score::{Score, score_task, task_urgency};
pub use stats::{Stats, compute_stats};
