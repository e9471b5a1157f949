//! Builder for creating and configuring Navigator instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use tokio::task;

use super::Navigator;
use crate::{
    error::{PathwiseError, Result},
    generate::{RegenerationPipeline, RoadmapGenerator},
    rules::{RuleEngine, Thresholds},
    store::{MemoryStore, RoadmapStore, SqliteStore},
};

/// Builder for creating and configuring Navigator instances.
#[derive(Clone, Default)]
pub struct NavigatorBuilder {
    database_path: Option<PathBuf>,
    in_memory: bool,
    thresholds: Thresholds,
    generator: Option<Arc<dyn RoadmapGenerator>>,
    fallback_to_memory: bool,
}

impl NavigatorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/pathwise/pathwise.db` or
    /// `~/.local/share/pathwise/pathwise.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Keeps all state in process memory instead of SQLite.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets the primary roadmap generator. Without one, roadmaps come from
    /// the deterministic fallback.
    pub fn with_generator(mut self, generator: Arc<dyn RoadmapGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Uses the in-memory store when the database cannot be opened.
    pub fn fallback_to_memory(mut self, enabled: bool) -> Self {
        self.fallback_to_memory = enabled;
        self
    }

    /// Builds the configured navigator instance.
    ///
    /// # Errors
    ///
    /// Returns `PathwiseError::XdgDirectory` if no default path can be found,
    /// `PathwiseError::FileSystem` if the database directory cannot be
    /// created and `PathwiseError::Database` if schema initialization fails,
    /// unless falling back to memory is enabled.
    pub async fn build(self) -> Result<Navigator> {
        let engine = RuleEngine::new(self.thresholds);
        let pipeline = RegenerationPipeline::new(self.generator);

        let store: Arc<dyn RoadmapStore> = if self.in_memory {
            Arc::new(MemoryStore::new())
        } else {
            match Self::open_sqlite(self.database_path).await {
                Ok(store) => {
                    info!("Using roadmap database at {}", store.path().display());
                    Arc::new(store)
                }
                Err(e) if self.fallback_to_memory => {
                    warn!("Could not open roadmap database ({e}); keeping state in memory");
                    Arc::new(MemoryStore::new())
                }
                Err(e) => return Err(e),
            }
        };

        Ok(Navigator::new(store, engine, pipeline))
    }

    async fn open_sqlite(database_path: Option<PathBuf>) -> Result<SqliteStore> {
        let db_path = match database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        task::spawn_blocking(move || SqliteStore::open(db_path))
            .await
            .map_err(|e| PathwiseError::join(&e))?
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("pathwise")
            .place_data_file("pathwise.db")
            .map_err(|e| PathwiseError::XdgDirectory(e.to_string()))
    }
}
