//! End-to-end scheduling scenarios over JSON snapshots

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use smartdo_core::config::{Config, DeadlinePolicy, DependencyPolicy};
use smartdo_core::tasks::{Priority, Status, Task};
use smartdo_core::{
    Error, Stats, TaskSet, compute_stats, dependency_view, rank, ready_tasks, recommend,
    recommend_next, task_urgency, validate_dependencies,
};
use std::collections::BTreeSet;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
}

fn at(hours: i64) -> DateTime<Utc> {
    now() + Duration::hours(hours)
}

#[test]
fn test_empty_snapshot_yields_empty_results() {
    let set = TaskSet::from_json_str("[]", DeadlinePolicy::AssumeUtc).unwrap();
    let tasks = set.tasks();

    assert!(ready_tasks(tasks).is_empty());
    assert_eq!(recommend(tasks, now()), None);
    assert!(recommend_next(tasks, now()).is_none());
    assert_eq!(compute_stats(tasks, now()), Stats::default());
    assert!(rank(tasks, now(), &Config::default(), None).is_empty());
}

#[test]
fn test_prerequisite_scenario_from_json() {
    let json = format!(
        r#"{{"tasks": [
            {{"id":"1","title":"Draft","deadline":"{}","priority":"high","duration":60,"status":"pending","dependencies":[]}},
            {{"id":"2","title":"Review","deadline":"{}","priority":"medium","duration":30,"status":"pending","dependencies":["1"]}}
        ]}}"#,
        at(-2).to_rfc3339(),
        at(48).to_rfc3339(),
    );
    let set = TaskSet::from_json_str(&json, DeadlinePolicy::Reject).unwrap();

    assert_eq!(ready_tasks(set.tasks()), BTreeSet::from(["1".to_string()]));
    assert_eq!(recommend(set.tasks(), now()).as_deref(), Some("1"));
    assert_eq!(recommend_next(set.tasks(), now()).map(|t| t.title.as_str()), Some("Draft"));
}

#[test]
fn test_overdue_low_outranks_distant_high() {
    let tasks = vec![
        Task::new("Y", Priority::High, at(200)),
        Task::new("X", Priority::Low, at(-10)),
    ];
    assert_eq!(recommend(&tasks, now()).as_deref(), Some("X"));

    let ranked = rank(&tasks, now(), &Config::default(), None);
    assert_eq!(ranked[0].task_id, "X");
    assert!((ranked[0].score.value - 110.0).abs() < 1e-9);
    assert!(ranked[1].score.value.abs() < 1e-9);
}

#[test]
fn test_priority_weight_is_exact_multiple() {
    let tasks = vec![
        Task::new("hi", Priority::High, at(30)),
        Task::new("lo", Priority::Low, at(30)),
    ];
    let config = Config::default();
    let high = task_urgency("hi", &tasks, now(), &config.scoring).unwrap();
    let low = task_urgency("lo", &tasks, now(), &config.scoring).unwrap();

    assert!((high.value - 3.0 * low.value).abs() < 1e-9);
}

#[test]
fn test_stats_overdue_counts_unfinished_only() {
    let tasks = vec![
        Task::new("a", Priority::Medium, at(-1)).with_status(Status::InProgress),
        Task::new("b", Priority::Medium, at(-1)).with_status(Status::Completed),
    ];
    let stats = compute_stats(&tasks, now());
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.total, 2);
}

#[test]
fn test_edit_sequence_rejects_cycle() {
    let mut tasks = vec![
        Task::new("A", Priority::Low, at(10)),
        Task::new("B", Priority::Low, at(10)).with_dependencies(["A"]),
        Task::new("C", Priority::Low, at(10)).with_dependencies(["B"]),
    ];

    let deps = vec!["C".to_string()];
    validate_dependencies("D", &deps, &tasks, DependencyPolicy::Tolerate).unwrap();
    tasks.push(Task::new("D", Priority::Low, at(10)).with_dependencies(deps));

    let err = validate_dependencies("A", &["D".to_string()], &tasks, DependencyPolicy::Tolerate)
        .unwrap_err();
    assert!(err.is_rejected_edit());
    assert_eq!(err.to_string(), "Circular dependency detected: A -> D -> C -> B -> A");

    // Replacing A's edges with harmless ones is fine
    validate_dependencies("A", &[], &tasks, DependencyPolicy::Tolerate).unwrap();
}

#[test]
fn test_strict_policy_from_config() {
    let config = Config::from_toml_str("[dependencies]\nunknown = \"reject\"\n").unwrap();
    let tasks = vec![Task::new("A", Priority::Low, at(10))];

    let err = validate_dependencies(
        "B",
        &["ghost".to_string()],
        &tasks,
        config.dependencies.unknown,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Graph(_)));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_completing_prerequisite_unblocks_dependent() {
    let mut tasks = vec![
        Task::new("A", Priority::Low, at(10)),
        Task::new("B", Priority::High, at(5)).with_dependencies(["A"]),
    ];
    assert_eq!(recommend(&tasks, now()).as_deref(), Some("A"));

    tasks[0].status = Status::Completed;
    assert_eq!(recommend(&tasks, now()).as_deref(), Some("B"));
    assert_eq!(dependency_view(&tasks).ready_tasks, vec!["B"]);
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Pending),
        Just(Status::InProgress),
        Just(Status::Completed)
    ]
}

prop_compose! {
    fn snapshot_strategy()(
        specs in prop::collection::vec(
            (priority_strategy(), status_strategy(), -300i64..300, 1u32..240, prop::collection::vec(0usize..12, 0..3)),
            0..12,
        )
    ) -> Vec<Task> {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (priority, status, hours, duration, deps))| {
                Task::new(format!("t{i}"), priority, at(hours))
                    .with_status(status)
                    .with_duration(duration)
                    .with_dependencies(deps.into_iter().filter(|d| *d != i).map(|d| format!("t{d}")))
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn prop_recommendation_is_deterministic(tasks in snapshot_strategy()) {
        let first = recommend(&tasks, now());
        prop_assert_eq!(&first, &recommend(&tasks, now()));
    }

    #[test]
    fn prop_recommendation_is_ready_and_top_ranked(tasks in snapshot_strategy()) {
        let ready = ready_tasks(&tasks);
        let ranked = rank(&tasks, now(), &Config::default(), Some(usize::MAX));

        prop_assert_eq!(ranked.len(), ready.len());
        match recommend(&tasks, now()) {
            Some(id) => {
                prop_assert!(ready.contains(&id));
                prop_assert_eq!(&ranked[0].task_id, &id);
                for pair in ranked.windows(2) {
                    prop_assert!(pair[0].score.value >= pair[1].score.value);
                }
            }
            None => prop_assert!(ready.is_empty()),
        }
    }

    #[test]
    fn prop_stats_partition_total(tasks in snapshot_strategy()) {
        let stats = compute_stats(&tasks, now());
        prop_assert_eq!(stats.pending + stats.in_progress + stats.completed, stats.total);
        prop_assert!(stats.overdue <= stats.total - stats.completed);
        prop_assert_eq!(stats.ready, ready_tasks(&tasks).len());
    }
}
