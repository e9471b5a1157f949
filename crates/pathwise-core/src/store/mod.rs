//! Storage port for the versioned roadmap state.
//!
//! [`RoadmapStore`] is the only persistence seam the engine knows about. Two
//! implementations ship with the crate:
//!
//! - [`SqliteStore`], backed by a SQLite file
//! - [`MemoryStore`], which keeps equivalent state in process memory and is
//!   used when no database can be opened
//!
//! Both keep the single-active-version invariant the same way: the user row
//! carries the id of its active version, and creating a version writes the
//! version, its tasks and the pointer as one atomic step.

use crate::error::Result;
use crate::models::{NewRoadmapVersion, ProgressSnapshot, RoadmapVersion, Task, TaskStatus, UserProfile};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence operations over users, roadmap versions, tasks and progress.
///
/// Methods block; async callers run them on a blocking thread.
pub trait RoadmapStore: Send + Sync {
    /// Short backend name for logs and status output.
    fn backend(&self) -> &'static str;

    /// Inserts or updates a profile and returns it as stored. The active
    /// roadmap pointer is owned by the store and never overwritten here.
    fn upsert_user(&self, user: &UserProfile) -> Result<UserProfile>;

    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Appends a version, materializes one pending task per task string and
    /// makes the version active.
    fn create_version(&self, user_id: &str, version: &NewRoadmapVersion) -> Result<RoadmapVersion>;

    fn get_version(&self, roadmap_id: u64) -> Result<Option<RoadmapVersion>>;

    fn get_active(&self, user_id: &str) -> Result<Option<RoadmapVersion>>;

    /// Every version of the user, most recent first.
    fn get_history(&self, user_id: &str) -> Result<Vec<RoadmapVersion>>;

    /// Moves the active version's pointer, clamped to `[1, total_weeks]`.
    /// Returns `false` when there is no active version.
    fn set_current_week(&self, user_id: &str, week: u32) -> Result<bool>;

    /// Tasks of one version in roadmap order, optionally for a single week.
    fn get_tasks(&self, roadmap_id: u64, week_number: Option<u32>) -> Result<Vec<Task>>;

    fn get_task(&self, task_id: u64) -> Result<Option<Task>>;

    /// Applies a lifecycle transition; anything but leaving `pending` fails.
    fn update_task_status(&self, task_id: u64, status: TaskStatus) -> Result<Task>;

    fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<()>;

    fn get_progress(&self, user_id: &str) -> Result<Option<ProgressSnapshot>>;
}
