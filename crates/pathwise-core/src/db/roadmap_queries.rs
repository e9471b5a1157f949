//! Roadmap version queries and the active-version pointer.

use jiff::Timestamp;
use log::info;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use super::utils::{optional_timestamp, timestamp, unsigned};
use crate::{
    error::{DatabaseResultExt, PathwiseError, Result},
    models::{clamp_week, materialize_tasks, NewRoadmapVersion, Phase, RoadmapVersion},
};

const INSERT_VERSION_SQL: &str = "INSERT INTO roadmap_versions (user_id, total_weeks, current_week, body, rebalance_reason, created_at, last_rebalanced_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (user_id, roadmap_id, week_number, task_key, title, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)";
const UPDATE_ACTIVE_POINTER_SQL: &str =
    "UPDATE users SET active_roadmap_id = ?1, updated_at = ?2 WHERE id = ?3";
const CHECK_USER_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)";

const VERSION_COLUMNS: &str = "v.id, v.user_id, v.total_weeks, v.current_week, v.body, v.rebalance_reason, v.created_at, v.last_rebalanced_at, COALESCE(u.active_roadmap_id = v.id, 0)";
const VERSION_SOURCE: &str = "roadmap_versions v JOIN users u ON u.id = v.user_id";

const UPDATE_CURRENT_WEEK_SQL: &str =
    "UPDATE roadmap_versions SET current_week = MIN(MAX(?1, 1), MAX(total_weeks, 1)) WHERE id = ?2";

impl super::Database {
    fn build_version_from_row(row: &Row) -> rusqlite::Result<RoadmapVersion> {
        let body: String = row.get(4)?;
        let phases = serde_json::from_str::<Vec<Phase>>(&body)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(RoadmapVersion {
            id: row.get::<_, i64>(0)? as u64,
            user_id: row.get(1)?,
            total_weeks: unsigned(row, 2)?,
            current_week: unsigned(row, 3)?,
            phases,
            rebalance_reason: row.get(5)?,
            version: timestamp(row, 6)?,
            last_rebalanced_at: optional_timestamp(row, 7)?,
            is_active: row.get(8)?,
        })
    }

    /// Stores a new version, materializes its tasks and makes it the user's
    /// active version, all in one transaction.
    pub fn create_version(
        &mut self,
        user_id: &str,
        new_version: &NewRoadmapVersion,
    ) -> Result<RoadmapVersion> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let user_exists: bool = tx
            .query_row(CHECK_USER_EXISTS_SQL, params![user_id], |row| row.get(0))
            .db_context("Failed to check user existence")?;
        if !user_exists {
            return Err(PathwiseError::UserNotFound {
                id: user_id.to_string(),
            });
        }

        let body = &new_version.body;
        let current_week = clamp_week(new_version.current_week, body.total_weeks);
        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_VERSION_SQL,
            params![
                user_id,
                body.total_weeks,
                current_week,
                serde_json::to_string(&body.phases)?,
                new_version.rebalance_reason,
                &now_str,
                new_version.rebalanced_at.map(|at| at.to_string()),
            ],
        )
        .db_context("Failed to insert roadmap version")?;

        let roadmap_id = tx.last_insert_rowid();

        {
            let mut insert_task = tx
                .prepare(INSERT_TASK_SQL)
                .db_context("Failed to prepare task insert")?;
            for task in materialize_tasks(&body.phases) {
                insert_task
                    .execute(params![
                        user_id,
                        roadmap_id,
                        task.week_number,
                        task.task_key,
                        task.title,
                        &now_str
                    ])
                    .db_context("Failed to insert task")?;
            }
        }

        tx.execute(
            UPDATE_ACTIVE_POINTER_SQL,
            params![roadmap_id, &now_str, user_id],
        )
        .db_context("Failed to activate roadmap version")?;

        tx.commit().db_context("Failed to commit transaction")?;

        info!(
            "Created roadmap version {roadmap_id} for user '{user_id}' ({} weeks)",
            body.total_weeks
        );

        Ok(RoadmapVersion {
            id: roadmap_id as u64,
            user_id: user_id.to_string(),
            version: now,
            total_weeks: body.total_weeks,
            current_week,
            phases: body.phases.clone(),
            is_active: true,
            rebalance_reason: new_version.rebalance_reason.clone(),
            last_rebalanced_at: new_version.rebalanced_at,
        })
    }

    /// Retrieves one version by id.
    pub fn get_version(&self, roadmap_id: u64) -> Result<Option<RoadmapVersion>> {
        let sql = format!("SELECT {VERSION_COLUMNS} FROM {VERSION_SOURCE} WHERE v.id = ?1");
        self.connection
            .query_row(&sql, params![roadmap_id as i64], Self::build_version_from_row)
            .optional()
            .db_context("Failed to query roadmap version")
    }

    /// Retrieves the version the user's active pointer names.
    pub fn get_active_version(&self, user_id: &str) -> Result<Option<RoadmapVersion>> {
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM {VERSION_SOURCE} WHERE u.id = ?1 AND v.id = u.active_roadmap_id"
        );
        self.connection
            .query_row(&sql, params![user_id], Self::build_version_from_row)
            .optional()
            .db_context("Failed to query active roadmap version")
    }

    /// Lists every version of the user, most recent first.
    pub fn get_history(&self, user_id: &str) -> Result<Vec<RoadmapVersion>> {
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM {VERSION_SOURCE} WHERE v.user_id = ?1 ORDER BY v.id DESC"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare history query")?;

        let mut versions = stmt
            .query_map(params![user_id], Self::build_version_from_row)
            .db_context("Failed to query roadmap history")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read roadmap history")?;

        // Timestamps are stored as text with variable precision, so order on
        // the parsed value.
        versions.sort_by(|a, b| b.version.cmp(&a.version).then(b.id.cmp(&a.id)));
        Ok(versions)
    }

    /// Moves the active version's week pointer, clamped to its length.
    /// Returns `false` when the user has no active version.
    pub fn set_current_week(&self, user_id: &str, week: u32) -> Result<bool> {
        let Some(roadmap_id) = self.active_roadmap_id(user_id)? else {
            return Ok(false);
        };

        self.connection
            .execute(UPDATE_CURRENT_WEEK_SQL, params![week, roadmap_id as i64])
            .db_context("Failed to update current week")?;
        Ok(true)
    }
}
