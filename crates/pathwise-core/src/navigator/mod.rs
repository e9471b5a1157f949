//! High-level async API over the roadmap engine.
//!
//! [`Navigator`] coordinates the storage port, the [`RuleEngine`] and the
//! [`RegenerationPipeline`]. Every store or generator call runs on a blocking
//! thread via `tokio::task::spawn_blocking`, so the navigator can be shared by
//! async front ends such as the MCP server.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Navigator     │    │  Rules / Gen    │    │  RoadmapStore   │
//! │ (user, roadmap, │───▶│ (evaluate,      │───▶│ (SQLite or      │
//! │  task, rebal.)  │    │  sanitize)      │    │  in-memory)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: configuration and store selection
//! - `user_ops`: profile creation and edits
//! - `roadmap_ops`: first roadmap, history and the week pointer
//! - `task_ops`: task listing and status changes
//! - `rebalance_ops`: progress, evaluation and rebalancing
//!
//! # Example
//!
//! ```rust
//! use pathwise_core::{params::{SaveUser, GenerateRoadmap, UserId}, NavigatorBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let navigator = NavigatorBuilder::new().in_memory().build().await?;
//!
//! navigator
//!     .create_user(&SaveUser {
//!         user_id: "ada".to_string(),
//!         name: "Ada".to_string(),
//!         target_role: "Data Analyst".to_string(),
//!         weekly_hours: 10,
//!         ..SaveUser::default()
//!     })
//!     .await?;
//!
//! let created = navigator
//!     .generate_roadmap(&GenerateRoadmap {
//!         user_id: "ada".to_string(),
//!         roadmap: None,
//!     })
//!     .await?;
//! assert_eq!(created.roadmap.total_weeks, 20);
//!
//! let report = navigator.progress(&UserId { user_id: "ada".to_string() }).await?;
//! assert_eq!(report.snapshot.completed_tasks_count, 0);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task;

use crate::{
    error::{PathwiseError, Result},
    generate::{
        GeneratedRoadmap, GenerationContext, RegenerationPipeline, ResponseGenerator,
    },
    rules::RuleEngine,
    store::RoadmapStore,
};

pub mod builder;
mod rebalance_ops;
mod roadmap_ops;
mod task_ops;
mod user_ops;


pub use builder::NavigatorBuilder;
pub use rebalance_ops::{ProgressReport, RebalanceCheck};
pub use roadmap_ops::{RoadmapUpdate, WeekView};
pub use task_ops::TaskList;
pub use user_ops::ProfileUpdate;

/// Main entry point for roadmap operations.
#[derive(Clone)]
pub struct Navigator {
    pub(crate) store: Arc<dyn RoadmapStore>,
    pub(crate) engine: RuleEngine,
    pub(crate) pipeline: RegenerationPipeline,
}

impl Navigator {
    pub(crate) fn new(
        store: Arc<dyn RoadmapStore>,
        engine: RuleEngine,
        pipeline: RegenerationPipeline,
    ) -> Self {
        Self {
            store,
            engine,
            pipeline,
        }
    }

    /// Name of the storage backend in use (`sqlite` or `memory`).
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Runs `operation` against the store on a blocking thread.
    pub(crate) async fn with_store<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RoadmapStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || operation(store.as_ref()))
            .await
            .map_err(|e| PathwiseError::join(&e))?
    }

    /// Runs the regeneration pipeline on a blocking thread. Captured
    /// generator output, when given, replaces the configured primary.
    pub(crate) async fn generate(
        &self,
        context: GenerationContext,
        roadmap_text: Option<String>,
    ) -> Result<GeneratedRoadmap> {
        let pipeline = match roadmap_text {
            Some(text) => RegenerationPipeline::new(Some(Arc::new(ResponseGenerator::text(text)))),
            None => self.pipeline.clone(),
        };

        task::spawn_blocking(move || pipeline.run(&context))
            .await
            .map_err(|e| PathwiseError::join(&e))
    }
}
