//! Status enumerations for tasks and pacing.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of task statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has not been acted on yet
    #[default]
    Pending,

    /// Task has been completed
    Completed,

    /// Task was skipped; counts as missed
    Skipped,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "skipped" | "missed" => Ok(TaskStatus::Skipped),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Skipped => "skipped",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Only pending tasks can change, and only to a terminal status.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Completed) | (TaskStatus::Pending, TaskStatus::Skipped)
        )
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use pathwise_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(TaskStatus::Skipped.with_icon(), "✗ Skipped");
    /// assert_eq!(TaskStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "✓ Completed",
            TaskStatus::Skipped => "✗ Skipped",
            TaskStatus::Pending => "○ Pending",
        }
    }
}

/// Actual versus expected completion, bucketed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    Ahead,
    #[default]
    OnTrack,
    SlightlyBehind,
    Behind,
}

impl PaceStatus {
    /// Classifies the gap between actual and expected completion percentages.
    pub fn from_gap(completion_percentage: f64, expected_percentage: f64) -> Self {
        let diff = completion_percentage - expected_percentage;
        if diff >= 10.0 {
            PaceStatus::Ahead
        } else if diff >= -10.0 {
            PaceStatus::OnTrack
        } else if diff >= -25.0 {
            PaceStatus::SlightlyBehind
        } else {
            PaceStatus::Behind
        }
    }

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "on_track",
            PaceStatus::SlightlyBehind => "slightly_behind",
            PaceStatus::Behind => "behind",
        }
    }
}

impl FromStr for PaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ahead" => Ok(PaceStatus::Ahead),
            "on_track" | "ontrack" => Ok(PaceStatus::OnTrack),
            "slightly_behind" => Ok(PaceStatus::SlightlyBehind),
            "behind" => Ok(PaceStatus::Behind),
            _ => Err(format!("Invalid pace status: {s}")),
        }
    }
}
