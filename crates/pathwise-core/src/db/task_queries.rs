//! Task queries and status transitions.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::utils::{optional_timestamp, parse_column, timestamp, unsigned};
use crate::{
    error::{DatabaseResultExt, PathwiseError, Result},
    models::{Task, TaskStatus},
};

const TASK_COLUMNS: &str =
    "id, user_id, roadmap_id, week_number, task_key, title, status, created_at, completed_at";
const UPDATE_TASK_STATUS_SQL: &str =
    "UPDATE tasks SET status = ?1, completed_at = ?2 WHERE id = ?3 AND status = ?4";

impl super::Database {
    fn build_task_from_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get::<_, i64>(0)? as u64,
            user_id: row.get(1)?,
            roadmap_id: row.get::<_, i64>(2)? as u64,
            week_number: unsigned(row, 3)?,
            task_key: row.get(4)?,
            title: row.get(5)?,
            status: parse_column::<TaskStatus>(row, 6)?,
            created_at: timestamp(row, 7)?,
            completed_at: optional_timestamp(row, 8)?,
        })
    }

    /// Lists a version's tasks in roadmap order, optionally for one week.
    pub fn get_tasks(&self, roadmap_id: u64, week_number: Option<u32>) -> Result<Vec<Task>> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE roadmap_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(roadmap_id as i64)];
        if let Some(week) = week_number {
            sql.push_str(" AND week_number = ?2");
            params_vec.push(Box::new(week));
        }
        sql.push_str(" ORDER BY week_number, id");

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare task query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let tasks = stmt
            .query_map(params_refs.as_slice(), Self::build_task_from_row)
            .db_context("Failed to query tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read tasks")?;
        Ok(tasks)
    }

    /// Retrieves one task by id.
    pub fn get_task(&self, task_id: u64) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        self.connection
            .query_row(&sql, params![task_id as i64], Self::build_task_from_row)
            .optional()
            .db_context("Failed to query task")
    }

    /// Moves a pending task to `status`. Completion stamps `completed_at`.
    pub fn update_task_status(&mut self, task_id: u64, status: TaskStatus) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = tx
            .query_row(&sql, params![task_id as i64], Self::build_task_from_row)
            .optional()
            .db_context("Failed to query task")?
            .ok_or(PathwiseError::TaskNotFound { id: task_id })?;

        if !task.status.can_transition_to(status) {
            return Err(PathwiseError::InvalidTransition {
                id: task_id,
                from: task.status,
                to: status,
            });
        }

        let completed_at = (status == TaskStatus::Completed).then(Timestamp::now);
        tx.execute(
            UPDATE_TASK_STATUS_SQL,
            params![
                status.as_str(),
                completed_at.map(|at| at.to_string()),
                task_id as i64,
                task.status.as_str()
            ],
        )
        .db_context("Failed to update task status")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Task {
            status,
            completed_at,
            ..task
        })
    }
}
