//! Configuration types for smartdo
//!
//! Every field is optional in the TOML file; missing values fall back to the
//! defaults below, which reproduce the stock scoring rules.
//!
//! ```toml
//! [scoring]
//! urgency_horizon_hours = 100.0
//!
//! [scoring.priority_weights]
//! high = 3.0
//! medium = 2.0
//! low = 1.0
//!
//! [dependencies]
//! unknown = "tolerate"
//!
//! [deadlines]
//! naive = "assume-utc"
//!
//! [recommendations]
//! limit = 5
//! due_soon_hours = 72.0
//! quick_win_minutes = 60
//! ```

use crate::tasks::Priority;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use smartdo_task_graph::UnknownDependencies;
use std::path::Path;
use tracing::debug;

/// Main configuration structure for smartdo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Urgency/priority scoring parameters
    pub scoring: ScoringConfig,

    /// Dependency validation policy
    pub dependencies: DependencyConfig,

    /// Deadline normalization policy
    pub deadlines: DeadlineConfig,

    /// Ranked recommendation settings
    pub recommendations: RecommendationConfig,
}

impl Config {
    /// Parse configuration from TOML text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the text is not valid TOML, contains
    /// unknown keys, or holds out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the errors of
    /// [`Config::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(e, Some(path.to_path_buf()), "reading configuration file")
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let weights = &self.scoring.priority_weights;
        let non_negative = [
            ("scoring.urgency_horizon_hours", self.scoring.urgency_horizon_hours),
            ("scoring.priority_weights.high", weights.high),
            ("scoring.priority_weights.medium", weights.medium),
            ("scoring.priority_weights.low", weights.low),
            (
                "recommendations.due_soon_hours",
                self.recommendations.due_soon_hours,
            ),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::configuration(format!(
                    "{field} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if self.recommendations.limit == 0 {
            return Err(Error::configuration(
                "recommendations.limit must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Urgency/priority scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Hours before the deadline at which urgency starts rising above zero
    pub urgency_horizon_hours: f64,

    /// Multiplier applied to urgency per priority level
    pub priority_weights: PriorityWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            urgency_horizon_hours: 100.0,
            priority_weights: PriorityWeights::default(),
        }
    }
}

/// Score multiplier for each priority level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityWeights {
    /// Weight of `high` priority tasks
    pub high: f64,
    /// Weight of `medium` priority tasks
    pub medium: f64,
    /// Weight of `low` priority tasks
    pub low: f64,
}

impl PriorityWeights {
    /// Weight for a priority level.
    #[must_use]
    pub const fn weight(&self, priority: Priority) -> f64 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            high: 3.0,
            medium: 2.0,
            low: 1.0,
        }
    }
}

/// Dependency validation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyConfig {
    /// What to do with dependency ids that match no task
    pub unknown: DependencyPolicy,
}

/// Treatment of dependency ids that match no task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyPolicy {
    /// Accept the edit; the task stays blocked until the reference is fixed
    #[default]
    Tolerate,
    /// Reject the edit
    Reject,
}

impl From<DependencyPolicy> for UnknownDependencies {
    fn from(policy: DependencyPolicy) -> Self {
        match policy {
            DependencyPolicy::Tolerate => Self::Tolerate,
            DependencyPolicy::Reject => Self::Reject,
        }
    }
}

/// Deadline normalization policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DeadlineConfig {
    /// What to do with deadlines that carry no timezone
    pub naive: DeadlinePolicy,
}

/// Treatment of timestamps without a timezone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlinePolicy {
    /// Interpret them as UTC
    #[default]
    AssumeUtc,
    /// Refuse them
    Reject,
}

/// Ranked recommendation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RecommendationConfig {
    /// Maximum number of ranked recommendations returned
    pub limit: usize,
    /// Deadlines closer than this many hours are flagged as due soon
    pub due_soon_hours: f64,
    /// Tasks this short or shorter are flagged as quick wins
    pub quick_win_minutes: u32,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            due_soon_hours: 72.0,
            quick_win_minutes: 60,
        }
    }
}
