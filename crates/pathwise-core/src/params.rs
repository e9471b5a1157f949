//! Parameter structures for Pathwise operations
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde. Categorical fields travel as
//! strings so each interface can accept the same spellings; `validate`
//! methods turn them into typed values and report bad input as
//! [`PathwiseError::InvalidInput`].
//!
//! ## Wrapper pattern
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! CLI argument structs convert into these types with `From`; MCP tools take
//! them directly as `Parameters<T>` with the `schema` feature enabled.

use std::str::FromStr;

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PathwiseError, Result},
    models::{
        Deadline, FinancialConstraint, LifeEvent, RebalanceRequest, Situation, SkillLevel,
        TaskStatus, UserProfile, MAX_WEEKLY_HOURS, MIN_WEEKLY_HOURS,
    },
    rules::RebalanceTrigger,
};

/// Parameters for operations that only need a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UserId {
    /// The ID of the user to operate on
    pub user_id: String,
}

/// Parameters for creating or replacing a user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SaveUser {
    /// Unique user identifier
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Optional contact address
    pub email: Option<String>,
    /// Target job role (e.g. "Data Analyst")
    pub target_role: String,
    /// 'beginner', 'intermediate' or 'advanced' (default beginner)
    pub skill_level: Option<String>,
    /// Hours per week available for learning, between 3 and 40
    pub weekly_hours: u32,
    /// 'flexible', '3 months', '6 months', '1 year' or 'N weeks' (default flexible)
    pub deadline: Option<String>,
    /// 'free_only', 'mixed' or 'paid_allowed' (default free_only)
    pub financial_constraint: Option<String>,
    /// 'student', 'working_professional', 'career_break' or 'transitioning'
    pub situation: Option<String>,
    /// Free-text background
    pub background: Option<String>,
}

impl SaveUser {
    /// Validates the fields and builds a fresh profile.
    ///
    /// ```rust
    /// use pathwise_core::params::SaveUser;
    ///
    /// let params = SaveUser {
    ///     user_id: "ada".to_string(),
    ///     name: "Ada".to_string(),
    ///     target_role: "Data Analyst".to_string(),
    ///     weekly_hours: 10,
    ///     deadline: Some("3 months".to_string()),
    ///     ..SaveUser::default()
    /// };
    /// let profile = params.validate()?;
    /// assert_eq!(profile.deadline.weeks(), Some(12));
    /// # pathwise_core::Result::<()>::Ok(())
    /// ```
    pub fn validate(&self) -> Result<UserProfile> {
        let user_id = required("user_id", &self.user_id)?;
        let name = required("name", &self.name)?;
        let target_role = required("target_role", &self.target_role)?;
        let now = Timestamp::now();

        Ok(UserProfile {
            id: user_id,
            name,
            email: non_blank(self.email.as_deref()),
            target_role,
            skill_level: parse_or_default("skill_level", self.skill_level.as_deref())?,
            weekly_hours: validate_weekly_hours(self.weekly_hours)?,
            deadline: parse_or_default("deadline", self.deadline.as_deref())?,
            financial_constraint: parse_or_default(
                "financial_constraint",
                self.financial_constraint.as_deref(),
            )?,
            situation: parse_or_default("situation", self.situation.as_deref())?,
            background: self.background.clone().unwrap_or_default(),
            onboarding_completed: false,
            active_roadmap_id: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Parameters for editing an existing profile. Absent fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateUser {
    /// ID of the user to update
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub target_role: Option<String>,
    pub skill_level: Option<String>,
    /// New weekly hours, between 3 and 40
    pub weekly_hours: Option<u32>,
    pub deadline: Option<String>,
    pub financial_constraint: Option<String>,
    pub situation: Option<String>,
    pub background: Option<String>,
}

impl UpdateUser {
    /// Applies the present fields on top of `current`.
    pub fn apply(&self, current: &UserProfile) -> Result<UserProfile> {
        let mut updated = current.clone();

        if let Some(name) = &self.name {
            updated.name = required("name", name)?;
        }
        if let Some(email) = &self.email {
            updated.email = non_blank(Some(email));
        }
        if let Some(target_role) = &self.target_role {
            updated.target_role = required("target_role", target_role)?;
        }
        if let Some(level) = &self.skill_level {
            updated.skill_level = parse_field("skill_level", level)?;
        }
        if let Some(hours) = self.weekly_hours {
            updated.weekly_hours = validate_weekly_hours(hours)?;
        }
        if let Some(deadline) = &self.deadline {
            updated.deadline = parse_field("deadline", deadline)?;
        }
        if let Some(constraint) = &self.financial_constraint {
            updated.financial_constraint = parse_field("financial_constraint", constraint)?;
        }
        if let Some(situation) = &self.situation {
            updated.situation = parse_field("situation", situation)?;
        }
        if let Some(background) = &self.background {
            updated.background = background.clone();
        }

        Ok(updated)
    }
}

/// Parameters for generating the first roadmap of a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GenerateRoadmap {
    /// ID of the user the roadmap is for
    pub user_id: String,
    /// Roadmap JSON produced by an external generator. When absent or
    /// unusable, a deterministic roadmap is built from the profile.
    pub roadmap: Option<String>,
}

/// Parameters for moving the current week pointer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetWeek {
    /// ID of the user whose active roadmap is updated
    pub user_id: String,
    /// 1-based week; values outside the roadmap are clamped
    pub week: u32,
}

/// Parameters for listing the active roadmap's tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTasks {
    /// ID of the user
    pub user_id: String,
    /// Restrict the listing to one week
    pub week: Option<u32>,
}

/// Parameters for completing or skipping a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateTask {
    /// Task ID to update
    pub task_id: u64,
    /// New status: 'completed' or 'skipped'
    pub status: String,
}

impl UpdateTask {
    /// Parses the target status. Tasks can only leave `pending`, so
    /// `pending` itself is rejected here.
    pub fn validate(&self) -> Result<TaskStatus> {
        let status = TaskStatus::from_str(&self.status).map_err(|_| {
            PathwiseError::invalid_input("status").with_reason(format!(
                "Invalid status: {}. Must be 'completed' or 'skipped'",
                self.status
            ))
        })?;

        if status == TaskStatus::Pending {
            return Err(PathwiseError::invalid_input("status")
                .with_reason("Tasks cannot be moved back to 'pending'"));
        }
        Ok(status)
    }
}

/// Parameters for evaluating whether a rebalance is needed.
///
/// The `previous_*` fields describe the profile before a recent edit; when
/// any is set, the profile-change checks run against them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct EvaluateRebalance {
    /// ID of the user to evaluate
    pub user_id: String,
    /// Weekly hours before the edit
    pub previous_weekly_hours: Option<u32>,
    /// Deadline before the edit
    pub previous_deadline: Option<String>,
    /// Situation before the edit
    pub previous_situation: Option<String>,
}

impl EvaluateRebalance {
    /// Reconstructs the earlier profile from `current`, or `None` when no
    /// previous value was given.
    pub fn previous_profile(&self, current: &UserProfile) -> Result<Option<UserProfile>> {
        if self.previous_weekly_hours.is_none()
            && self.previous_deadline.is_none()
            && self.previous_situation.is_none()
        {
            return Ok(None);
        }

        let mut previous = current.clone();
        if let Some(hours) = self.previous_weekly_hours {
            previous.weekly_hours = hours;
        }
        if let Some(deadline) = &self.previous_deadline {
            previous.deadline = parse_field("previous_deadline", deadline)?;
        }
        if let Some(situation) = &self.previous_situation {
            previous.situation = parse_field("previous_situation", situation)?;
        }
        Ok(Some(previous))
    }
}

/// Parameters for rebalancing the active roadmap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RebalanceRoadmap {
    /// ID of the user whose roadmap is rebalanced
    pub user_id: String,
    /// Why the rebalance is requested
    pub reason: Option<String>,
    /// New weekly hours, between 3 and 40
    pub weekly_hours: Option<u32>,
    /// New deadline ('flexible', '3 months', 'N weeks', ...)
    pub deadline: Option<String>,
    /// Extend (positive) or compress (negative) the timeline by this many weeks
    pub timeline_change_weeks: Option<i32>,
    /// Preset life event: new_job, more_time, family_care, burnout,
    /// motivation_high, health_break, career_pivot or celebration
    pub life_event: Option<String>,
    /// Trigger to attribute the rebalance to (default 'user_requested')
    pub trigger: Option<String>,
    /// Rebalanced roadmap JSON produced by an external generator
    pub roadmap: Option<String>,
}

impl RebalanceRoadmap {
    /// Parses the request. A life event excludes explicit hours, since the
    /// event decides them.
    pub fn validate(&self) -> Result<RebalanceRequest> {
        let life_event = self
            .life_event
            .as_deref()
            .map(|event| parse_field::<LifeEvent>("life_event", event))
            .transpose()?;

        if life_event.is_some() && self.weekly_hours.is_some() {
            return Err(PathwiseError::invalid_input("weekly_hours")
                .with_reason("Cannot combine explicit weekly hours with a life event"));
        }

        let trigger = match &self.trigger {
            Some(trigger) => parse_field::<RebalanceTrigger>("trigger", trigger)?,
            None => RebalanceTrigger::UserRequested,
        };

        Ok(RebalanceRequest {
            trigger,
            reason: non_blank(self.reason.as_deref()),
            new_weekly_hours: self.weekly_hours.map(validate_weekly_hours).transpose()?,
            new_deadline: self
                .deadline
                .as_deref()
                .map(|deadline| parse_field::<Deadline>("deadline", deadline))
                .transpose()?,
            timeline_change_weeks: self.timeline_change_weeks.unwrap_or(0),
            life_event,
            roadmap_text: non_blank(self.roadmap.as_deref()),
        })
    }
}

/// Rejects weekly hours outside the supported range.
pub fn validate_weekly_hours(hours: u32) -> Result<u32> {
    if (MIN_WEEKLY_HOURS..=MAX_WEEKLY_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(PathwiseError::invalid_input("weekly_hours").with_reason(format!(
            "{hours} is outside the supported range {MIN_WEEKLY_HOURS}-{MAX_WEEKLY_HOURS}"
        )))
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PathwiseError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn parse_field<T: FromStr<Err = String>>(field: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|reason: String| PathwiseError::invalid_input(field).with_reason(reason))
}

fn parse_or_default<T: FromStr<Err = String> + Default>(
    field: &str,
    value: Option<&str>,
) -> Result<T> {
    match non_blank(value) {
        Some(text) => parse_field(field, &text),
        None => Ok(T::default()),
    }
}
