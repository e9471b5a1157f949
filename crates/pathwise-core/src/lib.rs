//! Core library for the Pathwise career roadmap engine.
//!
//! Pathwise keeps a versioned, week-by-week learning roadmap for each user,
//! tracks task completion against the expected pace and rebuilds the roadmap
//! when progress, availability or life circumstances change.
//!
//! # Layers
//!
//! - **Models** ([`models`]): profiles, roadmap versions, tasks and progress
//!   snapshots
//! - **Rules** ([`rules`]): the deterministic rebalance rule engine
//! - **Generation** ([`generate`], [`sanitize`]): turning generator output or
//!   the built-in fallback into a well-formed roadmap
//! - **Storage** ([`store`], [`db`]): the [`RoadmapStore`] port with SQLite
//!   and in-memory backends
//! - **Navigator** ([`navigator`]): the async API the CLI and MCP server use
//! - **Display** ([`display`]): markdown formatting for every result
//!
//! # Quick Start
//!
//! ```rust
//! use pathwise_core::{params::{SaveUser, UpdateTask, UserId, GenerateRoadmap}, NavigatorBuilder};
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
//! println!("{created}");
//!
//! navigator
//!     .update_task(&UpdateTask {
//!         task_id: 1,
//!         status: "completed".to_string(),
//!     })
//!     .await?;
//!
//! let check = navigator
//!     .evaluate_against("ada", None)
//!     .await?;
//! println!("{check}");
//!
//! let report = navigator.progress(&UserId { user_id: "ada".to_string() }).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod generate;
pub mod models;
pub mod navigator;
pub mod params;
pub mod rules;
pub mod sanitize;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use display::{CreateResult, LifeEvents, OperationStatus, RoadmapHistory, Tasks};
pub use error::{PathwiseError, Result};
pub use generate::{
    GeneratedRoadmap, GenerationSource, RegenerationPipeline, ResponseGenerator, RoadmapGenerator,
};
pub use models::{
    Deadline, LifeEvent, PaceStatus, ProgressSnapshot, RebalanceRequest, RoadmapVersion, Task,
    TaskStatus, UserProfile,
};
pub use navigator::{Navigator, NavigatorBuilder};
pub use params::{
    EvaluateRebalance, GenerateRoadmap, ListTasks, RebalanceRoadmap, SaveUser, SetWeek,
    UpdateTask, UpdateUser, UserId,
};
pub use rules::{RebalanceRecommendation, RebalanceTrigger, RuleEngine, Severity, Thresholds};
pub use store::{MemoryStore, RoadmapStore, SqliteStore};
