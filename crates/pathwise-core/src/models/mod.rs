//! Data models for users, roadmap versions, tasks and progress.
//!
//! This module contains the core domain models of the Pathwise roadmap
//! engine. Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.
//!
//! # Versioning
//!
//! A [`RoadmapVersion`] is immutable once created apart from its week
//! pointer. Each rebalance appends a new version; the owning
//! [`UserProfile::active_roadmap_id`] names the one active version, and
//! `RoadmapVersion::is_active` is derived from that pointer when a version is
//! read back.
//!
//! # Examples
//!
//! ```rust
//! use pathwise_core::models::{Deadline, Situation};
//!
//! let deadline: Deadline = "3 months".parse().unwrap();
//! assert_eq!(deadline, Deadline::Weeks(12));
//! assert_eq!(deadline.to_storage(), "12 weeks");
//!
//! let situation: Situation = "Career Break".parse().unwrap();
//! assert_eq!(situation, Situation::CareerBreak);
//! ```

pub mod life_event;
pub mod progress;
pub mod requests;
pub mod roadmap;
pub mod status;
pub mod task;
pub mod user;

#[cfg(test)]
mod tests;

pub use life_event::LifeEvent;
pub use progress::{
    expected_percentage, missed_percentage_in_window, ProgressSnapshot, MISSED_TASK_WINDOW_WEEKS,
};
pub use requests::RebalanceRequest;
pub use roadmap::{
    clamp_week, NewRoadmapVersion, Phase, Resource, RoadmapBody, RoadmapVersion, Week,
};
pub use status::{PaceStatus, TaskStatus};
pub use task::{materialize_tasks, task_key, NewTask, Task};
pub use user::{
    Deadline, FinancialConstraint, Situation, SkillLevel, UserProfile, MAX_WEEKLY_HOURS,
    MIN_WEEKLY_HOURS,
};
