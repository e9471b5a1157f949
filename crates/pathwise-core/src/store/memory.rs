//! In-process store used when no database is available.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use jiff::Timestamp;
use log::info;

use super::RoadmapStore;
use crate::{
    error::{PathwiseError, Result},
    models::{
        clamp_week, materialize_tasks, NewRoadmapVersion, ProgressSnapshot, RoadmapVersion, Task,
        TaskStatus, UserProfile,
    },
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, UserProfile>,
    /// Indexed by `id - 1`
    versions: Vec<RoadmapVersion>,
    /// Indexed by `id - 1`
    tasks: Vec<Task>,
    progress: HashMap<String, ProgressSnapshot>,
}

/// Position of a 1-based id in its vector.
fn slot(id: u64) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1)
}

impl State {
    /// Copies a version out with `is_active` derived from the owner's pointer.
    fn version(&self, roadmap_id: u64) -> Option<RoadmapVersion> {
        let mut version = self.versions.get(slot(roadmap_id)?)?.clone();
        version.is_active = self
            .users
            .get(&version.user_id)
            .and_then(|user| user.active_roadmap_id)
            == Some(roadmap_id);
        Some(version)
    }
}

/// Keeps all state behind one mutex, so every operation is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| PathwiseError::Configuration {
            message: "memory store lock poisoned".to_string(),
        })
    }
}

impl RoadmapStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn upsert_user(&self, user: &UserProfile) -> Result<UserProfile> {
        let mut state = self.state()?;
        let now = Timestamp::now();

        let stored = match state.users.get(&user.id) {
            Some(existing) => UserProfile {
                active_roadmap_id: existing.active_roadmap_id,
                created_at: existing.created_at,
                updated_at: now,
                ..user.clone()
            },
            None => UserProfile {
                active_roadmap_id: None,
                created_at: now,
                updated_at: now,
                ..user.clone()
            },
        };
        state.users.insert(user.id.clone(), stored.clone());
        Ok(stored)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.state()?.users.get(user_id).cloned())
    }

    fn create_version(&self, user_id: &str, version: &NewRoadmapVersion) -> Result<RoadmapVersion> {
        let mut state = self.state()?;
        if !state.users.contains_key(user_id) {
            return Err(PathwiseError::UserNotFound {
                id: user_id.to_string(),
            });
        }

        let now = Timestamp::now();
        let roadmap_id = state.versions.len() as u64 + 1;
        let body = &version.body;
        let created = RoadmapVersion {
            id: roadmap_id,
            user_id: user_id.to_string(),
            version: now,
            total_weeks: body.total_weeks,
            current_week: clamp_week(version.current_week, body.total_weeks),
            phases: body.phases.clone(),
            is_active: true,
            rebalance_reason: version.rebalance_reason.clone(),
            last_rebalanced_at: version.rebalanced_at,
        };
        state.versions.push(created.clone());

        for new_task in materialize_tasks(&body.phases) {
            let id = state.tasks.len() as u64 + 1;
            state.tasks.push(Task {
                id,
                user_id: user_id.to_string(),
                roadmap_id,
                week_number: new_task.week_number,
                task_key: new_task.task_key,
                title: new_task.title,
                status: TaskStatus::Pending,
                created_at: now,
                completed_at: None,
            });
        }

        if let Some(user) = state.users.get_mut(user_id) {
            user.active_roadmap_id = Some(roadmap_id);
            user.updated_at = now;
        }

        info!(
            "Created roadmap version {roadmap_id} for user '{user_id}' ({} weeks, in memory)",
            body.total_weeks
        );
        Ok(created)
    }

    fn get_version(&self, roadmap_id: u64) -> Result<Option<RoadmapVersion>> {
        Ok(self.state()?.version(roadmap_id))
    }

    fn get_active(&self, user_id: &str) -> Result<Option<RoadmapVersion>> {
        let state = self.state()?;
        Ok(state
            .users
            .get(user_id)
            .and_then(|user| user.active_roadmap_id)
            .and_then(|id| state.version(id)))
    }

    fn get_history(&self, user_id: &str) -> Result<Vec<RoadmapVersion>> {
        let state = self.state()?;
        let mut history: Vec<RoadmapVersion> = state
            .versions
            .iter()
            .filter(|version| version.user_id == user_id)
            .filter_map(|version| state.version(version.id))
            .collect();
        history.sort_by(|a, b| b.version.cmp(&a.version).then(b.id.cmp(&a.id)));
        Ok(history)
    }

    fn set_current_week(&self, user_id: &str, week: u32) -> Result<bool> {
        let mut state = self.state()?;
        let Some(roadmap_id) = state.users.get(user_id).and_then(|u| u.active_roadmap_id) else {
            return Ok(false);
        };

        match slot(roadmap_id).filter(|index| *index < state.versions.len()) {
            Some(index) => {
                let version = &mut state.versions[index];
                version.current_week = clamp_week(week, version.total_weeks);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_tasks(&self, roadmap_id: u64, week_number: Option<u32>) -> Result<Vec<Task>> {
        let state = self.state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| task.roadmap_id == roadmap_id)
            .filter(|task| week_number.map_or(true, |week| task.week_number == week))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.week_number, task.id));
        Ok(tasks)
    }

    fn get_task(&self, task_id: u64) -> Result<Option<Task>> {
        let state = self.state()?;
        Ok(slot(task_id).and_then(|i| state.tasks.get(i)).cloned())
    }

    fn update_task_status(&self, task_id: u64, status: TaskStatus) -> Result<Task> {
        let mut state = self.state()?;
        let index = slot(task_id)
            .filter(|index| *index < state.tasks.len())
            .ok_or(PathwiseError::TaskNotFound { id: task_id })?;
        let task = &mut state.tasks[index];

        if !task.status.can_transition_to(status) {
            return Err(PathwiseError::InvalidTransition {
                id: task_id,
                from: task.status,
                to: status,
            });
        }

        task.status = status;
        task.completed_at = (status == TaskStatus::Completed).then(Timestamp::now);
        Ok(task.clone())
    }

    fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        self.state()?
            .progress
            .insert(snapshot.user_id.clone(), snapshot.clone());
        Ok(())
    }

    fn get_progress(&self, user_id: &str) -> Result<Option<ProgressSnapshot>> {
        Ok(self.state()?.progress.get(user_id).cloned())
    }
}
