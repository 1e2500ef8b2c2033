//! Next-task selection and ranked recommendations.

use super::ready::ready_in_order;
use super::score::{Score, score_task};
use crate::config::{Config, RecommendationConfig, ScoringConfig};
use crate::tasks::{Priority, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, instrument};

/// Why a task was recommended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reason {
    /// The task has high priority
    HighPriority,
    /// The deadline passed this many hours ago
    Overdue {
        /// Hours since the deadline
        hours: f64,
    },
    /// The deadline is this many hours away
    DueSoon {
        /// Hours until the deadline
        hours: f64,
    },
    /// The task is short
    QuickWin {
        /// Estimated duration
        minutes: u32,
    },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighPriority => f.write_str("High priority task"),
            Self::Overdue { hours } => write!(f, "Overdue by {hours:.1} hours"),
            Self::DueSoon { hours } => write!(f, "Due in {hours:.1} hours"),
            Self::QuickWin { minutes } => write!(f, "Quick win ({minutes} min)"),
        }
    }
}

/// A ranked, explained recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Id of the recommended task
    pub task_id: String,
    /// Its title
    pub title: String,
    /// Its priority
    pub priority: Priority,
    /// Its deadline
    pub deadline: DateTime<Utc>,
    /// Score at the ranking instant
    pub score: Score,
    /// Human-readable justification
    pub reasons: Vec<Reason>,
}

/// Score descending, then shorter duration, then earlier input position.
fn selection_order(a: &(usize, &Task, Score), b: &(usize, &Task, Score)) -> Ordering {
    b.2.value
        .total_cmp(&a.2.value)
        .then_with(|| a.1.duration.cmp(&b.1.duration))
        .then_with(|| a.0.cmp(&b.0))
}

/// Ready tasks paired with their score, best first.
fn scored_ready<'a>(
    tasks: &'a [Task],
    now: DateTime<Utc>,
    scoring: &ScoringConfig,
) -> Vec<(usize, &'a Task, Score)> {
    let mut scored: Vec<_> = ready_in_order(tasks)
        .into_iter()
        .enumerate()
        .map(|(index, task)| (index, task, score_task(task, now, scoring)))
        .collect();
    scored.sort_by(selection_order);
    scored
}

fn reasons(task: &Task, score: &Score, settings: &RecommendationConfig) -> Vec<Reason> {
    let mut reasons = Vec::new();
    if task.priority == Priority::High {
        reasons.push(Reason::HighPriority);
    }
    let hours = score.hours_until_deadline;
    if hours < 0.0 {
        reasons.push(Reason::Overdue { hours: -hours });
    } else if hours <= settings.due_soon_hours {
        reasons.push(Reason::DueSoon { hours });
    }
    if task.duration <= settings.quick_win_minutes {
        reasons.push(Reason::QuickWin {
            minutes: task.duration,
        });
    }
    reasons
}

/// Rank the ready tasks, best first.
///
/// `limit` defaults to `config.recommendations.limit`.
#[must_use]
#[instrument(skip(tasks, config), fields(task_count = tasks.len()))]
pub fn rank(
    tasks: &[Task],
    now: DateTime<Utc>,
    config: &Config,
    limit: Option<usize>,
) -> Vec<Recommendation> {
    let limit = limit.unwrap_or(config.recommendations.limit);
    scored_ready(tasks, now, &config.scoring)
        .into_iter()
        .take(limit)
        .map(|(_, task, score)| Recommendation {
            task_id: task.id.clone(),
            title: task.title.clone(),
            priority: task.priority,
            deadline: task.deadline,
            reasons: reasons(task, &score, &config.recommendations),
            score,
        })
        .collect()
}

/// The single best task to work on next, using the default scoring rules.
#[must_use]
pub fn recommend_next(tasks: &[Task], now: DateTime<Utc>) -> Option<&Task> {
    recommend_next_with(tasks, now, &ScoringConfig::default())
}

/// The single best task to work on next.
///
/// `None` when nothing is ready.
#[must_use]
#[instrument(skip(tasks, scoring), fields(task_count = tasks.len()))]
pub fn recommend_next_with<'a>(
    tasks: &'a [Task],
    now: DateTime<Utc>,
    scoring: &ScoringConfig,
) -> Option<&'a Task> {
    let best = scored_ready(tasks, now, scoring).into_iter().next();
    if let Some((_, task, score)) = &best {
        debug!(task = %task.id, score = score.value, "Selected next task");
    }
    best.map(|(_, task, _)| task)
}

/// Id of the task to work on next, using the default scoring rules.
#[must_use]
pub fn recommend(tasks: &[Task], now: DateTime<Utc>) -> Option<String> {
    recommend_with(tasks, now, &ScoringConfig::default())
}

/// Id of the task to work on next.
#[must_use]
pub fn recommend_with(
    tasks: &[Task],
    now: DateTime<Utc>,
    scoring: &ScoringConfig,
) -> Option<String> {
    recommend_next_with(tasks, now, scoring).map(|task| task.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Status;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn task(id: &str, priority: Priority, hours: i64) -> Task {
        Task::new(id, priority, now() + Duration::hours(hours))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(recommend(&[], now()), None);
        assert!(recommend_next(&[], now()).is_none());
        assert!(rank(&[], now(), &Config::default(), None).is_empty());
    }

    #[test]
    fn test_all_completed() {
        let tasks = vec![task("a", Priority::High, 1).with_status(Status::Completed)];
        assert_eq!(recommend(&tasks, now()), None);
    }

    #[test]
    fn test_overdue_low_beats_distant_high() {
        let tasks = vec![task("Y", Priority::High, 200), task("X", Priority::Low, -10)];
        assert_eq!(recommend(&tasks, now()).as_deref(), Some("X"));
    }

    #[test]
    fn test_blocked_task_is_skipped() {
        let tasks = vec![
            task("1", Priority::High, -2),
            task("2", Priority::Medium, 48).with_dependencies(["1"]),
        ];
        assert_eq!(recommend(&tasks, now()).as_deref(), Some("1"));
    }

    #[test]
    fn test_tie_prefers_shorter_duration() {
        let tasks = vec![
            task("long", Priority::Medium, 10).with_duration(120),
            task("short", Priority::Medium, 10).with_duration(15),
        ];
        assert_eq!(recommend(&tasks, now()).as_deref(), Some("short"));
    }

    #[test]
    fn test_full_tie_prefers_input_order() {
        let tasks = vec![
            task("first", Priority::Low, 500),
            task("second", Priority::Low, 500),
        ];
        assert_eq!(recommend(&tasks, now()).as_deref(), Some("first"));

        let swapped = vec![tasks[1].clone(), tasks[0].clone()];
        assert_eq!(recommend(&swapped, now()).as_deref(), Some("second"));
    }

    #[test]
    fn test_rank_order_and_limit() {
        let tasks = vec![
            task("a", Priority::Low, 50),
            task("b", Priority::High, 50),
            task("c", Priority::Medium, 50),
        ];
        let ranked = rank(&tasks, now(), &Config::default(), None);
        let ids: Vec<&str> = ranked.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let top = rank(&tasks, now(), &Config::default(), Some(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].task_id, recommend(&tasks, now()).unwrap());
    }

    #[test]
    fn test_config_limit_applies() {
        let mut config = Config::default();
        config.recommendations.limit = 2;
        let tasks: Vec<Task> = (0..4)
            .map(|i| task(&format!("t{i}"), Priority::Low, i))
            .collect();
        assert_eq!(rank(&tasks, now(), &config, None).len(), 2);
    }

    #[test]
    fn test_reasons() {
        let tasks = vec![
            task("late", Priority::High, -3).with_duration(30),
            task("soon", Priority::Low, 24).with_duration(240),
            task("later", Priority::Medium, 200).with_duration(240),
        ];
        let ranked = rank(&tasks, now(), &Config::default(), None);

        assert_eq!(
            ranked[0].reasons,
            vec![
                Reason::HighPriority,
                Reason::Overdue { hours: 3.0 },
                Reason::QuickWin { minutes: 30 },
            ]
        );
        assert_eq!(ranked[1].reasons, vec![Reason::DueSoon { hours: 24.0 }]);
        assert!(ranked[2].reasons.is_empty());
    }

    #[test]
    fn test_reason_display_and_serialization() {
        assert_eq!(Reason::Overdue { hours: 2.5 }.to_string(), "Overdue by 2.5 hours");
        assert_eq!(Reason::QuickWin { minutes: 15 }.to_string(), "Quick win (15 min)");

        let value = serde_json::to_value(Reason::DueSoon { hours: 5.0 }).unwrap();
        assert_eq!(value["kind"], "dueSoon");
        assert_eq!(value["hours"], 5.0);
    }

    #[test]
    fn test_custom_weights_change_selection() {
        let tasks = vec![task("hi", Priority::High, 50), task("lo", Priority::Low, 0)];
        assert_eq!(recommend(&tasks, now()).as_deref(), Some("hi"));

        let mut scoring = ScoringConfig::default();
        scoring.priority_weights.high = 1.0;
        assert_eq!(recommend_with(&tasks, now(), &scoring).as_deref(), Some("lo"));
    }
}
