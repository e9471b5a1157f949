//! Task operations for the Navigator.

use log::debug;

use super::{
    roadmap_ops::{refresh_progress, require_active},
    Navigator,
};
use crate::{
    error::{PathwiseError, Result},
    models::Task,
    params::{ListTasks, UpdateTask},
};

/// Tasks of the active roadmap, optionally limited to one week.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskList {
    pub roadmap_id: u64,
    pub week: Option<u32>,
    pub tasks: Vec<Task>,
}

impl Navigator {
    /// Lists the active roadmap's tasks in roadmap order.
    pub async fn list_tasks(&self, params: &ListTasks) -> Result<TaskList> {
        let user_id = params.user_id.clone();
        let week = params.week;

        self.with_store(move |store| {
            let roadmap = require_active(store, &user_id)?;
            let tasks = store.get_tasks(roadmap.id, week)?;
            Ok(TaskList {
                roadmap_id: roadmap.id,
                week,
                tasks,
            })
        })
        .await
    }

    /// Completes or skips a pending task and refreshes the owner's progress.
    pub async fn update_task(&self, params: &UpdateTask) -> Result<Task> {
        let status = params.validate()?;
        let task_id = params.task_id;

        self.with_store(move |store| {
            let task = store.update_task_status(task_id, status)?;
            debug!(
                "task {task_id} of user '{}' is now {}",
                task.user_id,
                task.status.as_str()
            );

            match require_active(store, &task.user_id) {
                Ok(roadmap) => {
                    refresh_progress(store, &roadmap)?;
                }
                Err(PathwiseError::NoActiveRoadmap { .. }) => {}
                Err(e) => return Err(e),
            }
            Ok(task)
        })
        .await
    }
}
