//! Roadmap version, phase and week models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The normalized plan content: phases of globally numbered weeks.
///
/// Bodies are produced by sanitation only; see [`crate::sanitize`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RoadmapBody {
    /// Length of the roadmap in weeks; sanitation keeps it equal to the week
    /// count
    pub total_weeks: u32,

    /// Ordered phases
    pub phases: Vec<Phase>,
}

impl RoadmapBody {
    /// Iterates every week across all phases in order.
    pub fn weeks(&self) -> impl Iterator<Item = &Week> {
        self.phases.iter().flat_map(|phase| phase.weeks.iter())
    }

    /// Number of weeks across all phases.
    pub fn week_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.weeks.len()).sum()
    }

    /// Number of task strings across all weeks.
    pub fn task_count(&self) -> usize {
        self.weeks().map(|week| week.tasks.len()).sum()
    }
}

/// A named group of consecutive weeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    #[serde(rename = "phase_name")]
    pub name: String,

    #[serde(
        rename = "phase_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    pub weeks: Vec<Week>,
}

/// The atomic weekly planning unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Week {
    /// Globally unique, 1-based, contiguous across phases
    pub week_number: u32,

    pub focus_skill: String,

    /// Task descriptions; materialized as [`super::Task`] rows per version
    pub tasks: Vec<String>,

    pub milestone: String,

    pub success_metric: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

/// A learning resource reference attached to a week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One immutable snapshot of a user's plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapVersion {
    /// Store-assigned identifier
    pub id: u64,

    /// Owning user
    pub user_id: String,

    /// Creation timestamp; the sort key within a user's history
    pub version: Timestamp,

    pub total_weeks: u32,

    /// 1-based pointer, clamped to `[1, total_weeks]`
    pub current_week: u32,

    pub phases: Vec<Phase>,

    /// Derived from the owner's active roadmap pointer
    #[serde(default)]
    pub is_active: bool,

    /// Why this version was created; `None` for the onboarding version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebalance_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rebalanced_at: Option<Timestamp>,
}

impl RoadmapVersion {
    /// Copies the plan content out of the version.
    pub fn body(&self) -> RoadmapBody {
        RoadmapBody {
            total_weeks: self.total_weeks,
            phases: self.phases.clone(),
        }
    }

    /// Looks up a week by its global number.
    pub fn week(&self, week_number: u32) -> Option<&Week> {
        self.phases
            .iter()
            .flat_map(|phase| phase.weeks.iter())
            .find(|week| week.week_number == week_number)
    }

    /// Clamps a requested week pointer into `[1, total_weeks]`.
    pub fn clamp_week(&self, week: u32) -> u32 {
        clamp_week(week, self.total_weeks)
    }

    /// Whether the pointer sits on the final week.
    pub fn is_final_week(&self) -> bool {
        self.current_week >= self.total_weeks
    }
}

/// A version that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoadmapVersion {
    pub body: RoadmapBody,
    /// Requested week pointer; the store clamps it to the new length
    pub current_week: u32,
    pub rebalance_reason: Option<String>,
    pub rebalanced_at: Option<Timestamp>,
}

impl NewRoadmapVersion {
    /// The onboarding version: week 1, no rebalance metadata.
    pub fn initial(body: RoadmapBody) -> Self {
        Self {
            body,
            current_week: 1,
            rebalance_reason: None,
            rebalanced_at: None,
        }
    }
}

/// Clamps a week pointer into `[1, total_weeks]`, treating an empty roadmap as
/// one week long.
pub fn clamp_week(week: u32, total_weeks: u32) -> u32 {
    week.clamp(1, total_weeks.max(1))
}
