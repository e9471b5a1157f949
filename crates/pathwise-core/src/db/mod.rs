//! SQLite persistence for users, roadmap versions, tasks and progress.
//!
//! This module provides the low-level database operations behind
//! [`crate::store::SqliteStore`]. A [`Database`] wraps one connection; the
//! store opens a fresh one for every operation, so no connection is shared
//! across threads.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod progress_queries;
pub mod roadmap_queries;
pub mod task_queries;
pub mod user_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
