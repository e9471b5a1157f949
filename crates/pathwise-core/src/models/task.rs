//! Task model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Phase, TaskStatus};

/// A trackable unit of work materialized from a week's task list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Store-assigned identifier
    pub id: u64,

    /// Owning user
    pub user_id: String,

    /// Roadmap version the task belongs to
    pub roadmap_id: u64,

    pub week_number: u32,

    /// Synthetic key `w{week}_t{position}`, unique within a version
    pub task_key: String,

    pub title: String,

    pub status: TaskStatus,

    pub created_at: Timestamp,

    /// Set when the task moves to completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

/// A task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub week_number: u32,
    pub task_key: String,
    pub title: String,
}

/// Builds the synthetic key for the task at 0-based `index` in a week.
pub fn task_key(week_number: u32, index: usize) -> String {
    format!("w{}_t{}", week_number, index + 1)
}

/// Expands every week's task strings into unsaved tasks, in roadmap order.
pub fn materialize_tasks(phases: &[Phase]) -> Vec<NewTask> {
    phases
        .iter()
        .flat_map(|phase| phase.weeks.iter())
        .flat_map(|week| {
            week.tasks.iter().enumerate().map(|(index, title)| NewTask {
                week_number: week.week_number,
                task_key: task_key(week.week_number, index),
                title: title.clone(),
            })
        })
        .collect()
}
