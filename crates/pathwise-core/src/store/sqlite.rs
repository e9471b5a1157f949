//! SQLite-backed store.

use std::path::{Path, PathBuf};

use super::RoadmapStore;
use crate::{
    db::Database,
    error::{PathwiseError, Result},
    models::{NewRoadmapVersion, ProgressSnapshot, RoadmapVersion, Task, TaskStatus, UserProfile},
};

/// Store that opens a fresh connection to one SQLite file per operation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Creates the parent directory if needed and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PathwiseError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Database::new(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn db(&self) -> Result<Database> {
        Database::new(&self.db_path)
    }
}

impl RoadmapStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn upsert_user(&self, user: &UserProfile) -> Result<UserProfile> {
        self.db()?.upsert_user(user)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.db()?.get_user(user_id)
    }

    fn create_version(&self, user_id: &str, version: &NewRoadmapVersion) -> Result<RoadmapVersion> {
        self.db()?.create_version(user_id, version)
    }

    fn get_version(&self, roadmap_id: u64) -> Result<Option<RoadmapVersion>> {
        self.db()?.get_version(roadmap_id)
    }

    fn get_active(&self, user_id: &str) -> Result<Option<RoadmapVersion>> {
        self.db()?.get_active_version(user_id)
    }

    fn get_history(&self, user_id: &str) -> Result<Vec<RoadmapVersion>> {
        self.db()?.get_history(user_id)
    }

    fn set_current_week(&self, user_id: &str, week: u32) -> Result<bool> {
        self.db()?.set_current_week(user_id, week)
    }

    fn get_tasks(&self, roadmap_id: u64, week_number: Option<u32>) -> Result<Vec<Task>> {
        self.db()?.get_tasks(roadmap_id, week_number)
    }

    fn get_task(&self, task_id: u64) -> Result<Option<Task>> {
        self.db()?.get_task(task_id)
    }

    fn update_task_status(&self, task_id: u64, status: TaskStatus) -> Result<Task> {
        self.db()?.update_task_status(task_id, status)
    }

    fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        self.db()?.save_progress(snapshot)
    }

    fn get_progress(&self, user_id: &str) -> Result<Option<ProgressSnapshot>> {
        self.db()?.get_progress(user_id)
    }
}
