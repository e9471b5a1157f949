//! Cached progress snapshots.

use rusqlite::{params, OptionalExtension, Row};

use super::utils::{parse_column, timestamp, unsigned};
use crate::{
    error::{DatabaseResultExt, Result},
    models::ProgressSnapshot,
};

const UPSERT_PROGRESS_SQL: &str = "INSERT OR REPLACE INTO progress_summary (user_id, roadmap_id, completion_percentage, completed_tasks_count, missed_tasks_count, total_tasks_count, expected_percentage, pace_status, current_week, total_weeks, last_updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const SELECT_PROGRESS_SQL: &str = "SELECT user_id, roadmap_id, completion_percentage, completed_tasks_count, missed_tasks_count, total_tasks_count, expected_percentage, pace_status, current_week, total_weeks, last_updated FROM progress_summary WHERE user_id = ?1";

impl super::Database {
    fn build_progress_from_row(row: &Row) -> rusqlite::Result<ProgressSnapshot> {
        Ok(ProgressSnapshot {
            user_id: row.get(0)?,
            roadmap_id: row.get::<_, i64>(1)? as u64,
            completion_percentage: row.get(2)?,
            completed_tasks_count: unsigned(row, 3)?,
            missed_tasks_count: unsigned(row, 4)?,
            total_tasks_count: unsigned(row, 5)?,
            expected_percentage: row.get(6)?,
            pace_status: parse_column(row, 7)?,
            current_week: unsigned(row, 8)?,
            total_weeks: unsigned(row, 9)?,
            last_updated: timestamp(row, 10)?,
        })
    }

    /// Replaces the user's cached snapshot.
    pub fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        self.connection
            .execute(
                UPSERT_PROGRESS_SQL,
                params![
                    snapshot.user_id,
                    snapshot.roadmap_id as i64,
                    snapshot.completion_percentage,
                    snapshot.completed_tasks_count,
                    snapshot.missed_tasks_count,
                    snapshot.total_tasks_count,
                    snapshot.expected_percentage,
                    snapshot.pace_status.as_str(),
                    snapshot.current_week,
                    snapshot.total_weeks,
                    snapshot.last_updated.to_string(),
                ],
            )
            .db_context("Failed to save progress summary")?;
        Ok(())
    }

    /// Retrieves the user's cached snapshot.
    pub fn get_progress(&self, user_id: &str) -> Result<Option<ProgressSnapshot>> {
        self.connection
            .query_row(SELECT_PROGRESS_SQL, params![user_id], Self::build_progress_from_row)
            .optional()
            .db_context("Failed to query progress summary")
    }
}
