//! Progress snapshot aggregated from a version's tasks.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PaceStatus, RoadmapVersion, Task, TaskStatus};

/// Number of trailing weeks inspected by [`missed_percentage_in_window`].
pub const MISSED_TASK_WINDOW_WEEKS: u32 = 2;

/// Derived, recomputable progress over the active roadmap's tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    pub user_id: String,
    /// Version the counts were taken from
    pub roadmap_id: u64,
    /// `completed / total * 100`, rounded to one decimal
    pub completion_percentage: f64,
    pub completed_tasks_count: u32,
    /// Skipped tasks
    pub missed_tasks_count: u32,
    pub total_tasks_count: u32,
    /// `current_week / total_weeks * 100`
    pub expected_percentage: f64,
    pub pace_status: PaceStatus,
    pub current_week: u32,
    pub total_weeks: u32,
    pub last_updated: Timestamp,
}

impl ProgressSnapshot {
    /// Aggregates `tasks` (expected to belong to `roadmap`) into a snapshot.
    pub fn from_tasks(roadmap: &RoadmapVersion, tasks: &[Task]) -> Self {
        let total = tasks.len() as u32;
        let completed = count_status(tasks, TaskStatus::Completed);
        let missed = count_status(tasks, TaskStatus::Skipped);

        let completion_percentage = if total > 0 {
            round_one_decimal(f64::from(completed) / f64::from(total) * 100.0)
        } else {
            0.0
        };
        let expected_percentage = expected_percentage(roadmap.current_week, roadmap.total_weeks);

        Self {
            user_id: roadmap.user_id.clone(),
            roadmap_id: roadmap.id,
            completion_percentage,
            completed_tasks_count: completed,
            missed_tasks_count: missed,
            total_tasks_count: total,
            expected_percentage,
            pace_status: PaceStatus::from_gap(completion_percentage, expected_percentage),
            current_week: roadmap.current_week,
            total_weeks: roadmap.total_weeks,
            last_updated: Timestamp::now(),
        }
    }

    /// Tasks neither completed nor skipped.
    pub fn pending_tasks_count(&self) -> u32 {
        self.total_tasks_count
            .saturating_sub(self.completed_tasks_count)
            .saturating_sub(self.missed_tasks_count)
    }
}

/// Share of the roadmap that should be done by `current_week`; 0 for an empty
/// roadmap.
pub fn expected_percentage(current_week: u32, total_weeks: u32) -> f64 {
    if total_weeks == 0 {
        return 0.0;
    }
    f64::from(current_week) / f64::from(total_weeks) * 100.0
}

/// Percentage of skipped tasks among those in the `window_weeks` weeks ending
/// at `current_week`. Returns 0 when the window holds no tasks.
pub fn missed_percentage_in_window(tasks: &[Task], current_week: u32, window_weeks: u32) -> f64 {
    let start_week = (current_week + 1).saturating_sub(window_weeks).max(1);
    let recent: Vec<&Task> = tasks
        .iter()
        .filter(|task| (start_week..=current_week).contains(&task.week_number))
        .collect();

    if recent.is_empty() {
        return 0.0;
    }

    let missed = recent
        .iter()
        .filter(|task| task.status == TaskStatus::Skipped)
        .count();
    missed as f64 / recent.len() as f64 * 100.0
}

fn count_status(tasks: &[Task], status: TaskStatus) -> u32 {
    tasks.iter().filter(|task| task.status == status).count() as u32
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
