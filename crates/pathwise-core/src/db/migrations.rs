//! Database schema initialization and migrations.

use log::info;

use crate::error::{DatabaseResultExt, Result};

const BACKFILL_ACTIVE_POINTER_SQL: &str = "UPDATE users SET active_roadmap_id = (
        SELECT id FROM roadmap_versions
        WHERE roadmap_versions.user_id = users.id AND roadmap_versions.is_active = 1
        ORDER BY created_at DESC, id DESC LIMIT 1
    ) WHERE active_roadmap_id IS NULL AND EXISTS (
        SELECT 1 FROM roadmap_versions
        WHERE roadmap_versions.user_id = users.id AND roadmap_versions.is_active = 1
    )";
const HAS_COLUMN_SQL: &str =
    "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2";

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Brings databases written by older releases up to date.
    fn apply_migrations(&self) -> Result<()> {
        if !self.has_column("users", "email") {
            self.connection
                .execute("ALTER TABLE users ADD COLUMN email TEXT", [])
                .db_context("Failed to add email column to users table")?;
        }

        if !self.has_column("users", "active_roadmap_id") {
            self.connection
                .execute(
                    "ALTER TABLE users ADD COLUMN active_roadmap_id INTEGER REFERENCES roadmap_versions(id)",
                    [],
                )
                .db_context("Failed to add active roadmap column to users table")?;
        }

        // Older databases kept one is_active flag per version instead of the
        // pointer on the user row.
        if self.has_column("roadmap_versions", "is_active") {
            let migrated = self
                .connection
                .execute(BACKFILL_ACTIVE_POINTER_SQL, [])
                .db_context("Failed to backfill active roadmap pointers")?;
            if migrated > 0 {
                info!("Migrated active roadmap flag to user pointer for {migrated} users");
            }
        }

        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> bool {
        self.connection
            .query_row(HAS_COLUMN_SQL, [table, column], |row| row.get(0))
            .map(|count: i64| count > 0)
            .unwrap_or(false)
    }
}
