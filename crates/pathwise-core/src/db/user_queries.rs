//! User profile queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::utils::{parse_column, timestamp, unsigned};
use crate::{
    error::{DatabaseResultExt, PathwiseError, Result},
    models::UserProfile,
};

const UPSERT_USER_SQL: &str = "INSERT INTO users (id, name, email, target_role, skill_level, weekly_hours, deadline, financial_constraint, situation, background, onboarding_completed, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
    ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email, target_role = excluded.target_role,
        skill_level = excluded.skill_level, weekly_hours = excluded.weekly_hours, deadline = excluded.deadline,
        financial_constraint = excluded.financial_constraint, situation = excluded.situation,
        background = excluded.background, onboarding_completed = excluded.onboarding_completed,
        updated_at = excluded.updated_at";
const SELECT_USER_SQL: &str = "SELECT id, name, email, target_role, skill_level, weekly_hours, deadline, financial_constraint, situation, background, onboarding_completed, active_roadmap_id, created_at, updated_at FROM users WHERE id = ?1";
const SELECT_ACTIVE_ROADMAP_ID_SQL: &str = "SELECT active_roadmap_id FROM users WHERE id = ?1";

impl super::Database {
    fn build_user_from_row(row: &Row) -> rusqlite::Result<UserProfile> {
        Ok(UserProfile {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            target_role: row.get(3)?,
            skill_level: parse_column(row, 4)?,
            weekly_hours: unsigned(row, 5)?,
            deadline: parse_column(row, 6)?,
            financial_constraint: parse_column(row, 7)?,
            situation: parse_column(row, 8)?,
            background: row.get(9)?,
            onboarding_completed: row.get(10)?,
            active_roadmap_id: row.get::<_, Option<i64>>(11)?.map(|id| id as u64),
            created_at: timestamp(row, 12)?,
            updated_at: timestamp(row, 13)?,
        })
    }

    /// Inserts or updates a profile. The active roadmap pointer and creation
    /// time of an existing row are left untouched.
    pub fn upsert_user(&self, user: &UserProfile) -> Result<UserProfile> {
        let now = Timestamp::now().to_string();

        self.connection
            .execute(
                UPSERT_USER_SQL,
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.target_role,
                    user.skill_level.as_str(),
                    user.weekly_hours,
                    user.deadline.to_storage(),
                    user.financial_constraint.as_str(),
                    user.situation.as_str(),
                    user.background,
                    user.onboarding_completed,
                    now,
                ],
            )
            .db_context("Failed to save user")?;

        self.get_user(&user.id)?
            .ok_or_else(|| PathwiseError::UserNotFound {
                id: user.id.clone(),
            })
    }

    /// Retrieves a profile by id.
    pub fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.connection
            .query_row(SELECT_USER_SQL, params![user_id], Self::build_user_from_row)
            .optional()
            .db_context("Failed to query user")
    }

    pub(crate) fn active_roadmap_id(&self, user_id: &str) -> Result<Option<u64>> {
        let id: Option<Option<i64>> = self
            .connection
            .query_row(SELECT_ACTIVE_ROADMAP_ID_SQL, params![user_id], |row| row.get(0))
            .optional()
            .db_context("Failed to query active roadmap")?;
        Ok(id.flatten().map(|id| id as u64))
    }
}
