//! User profile model and its categorical fields.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Lowest weekly hour budget Pathwise accepts.
pub const MIN_WEEKLY_HOURS: u32 = 3;

/// Highest weekly hour budget Pathwise accepts.
pub const MAX_WEEKLY_HOURS: u32 = 40;

/// A learner's profile: goal, constraints and the active roadmap pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Unique identifier chosen by the caller
    pub id: String,

    /// Display name
    pub name: String,

    /// Contact address, if known
    pub email: Option<String>,

    /// Job role the roadmap targets (e.g. "Data Analyst")
    pub target_role: String,

    /// Self-declared skill level
    pub skill_level: SkillLevel,

    /// Hours per week available for learning
    pub weekly_hours: u32,

    /// Fixed week count or flexible
    pub deadline: Deadline,

    /// Budget for paid resources
    pub financial_constraint: FinancialConstraint,

    /// Current life situation
    pub situation: Situation,

    /// Free-text background supplied during onboarding
    #[serde(default)]
    pub background: String,

    /// Whether onboarding produced a first roadmap
    #[serde(default)]
    pub onboarding_completed: bool,

    /// The single active roadmap version, if any
    #[serde(default)]
    pub active_roadmap_id: Option<u64>,

    /// Timestamp when the profile was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the profile was last modified (UTC)
    pub updated_at: Timestamp,
}

/// Declared skill level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            _ => Err(format!("Invalid skill level: {s}")),
        }
    }
}

/// Budget constraint for recommended resources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinancialConstraint {
    #[default]
    FreeOnly,
    Mixed,
    PaidAllowed,
}

impl FinancialConstraint {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialConstraint::FreeOnly => "free_only",
            FinancialConstraint::Mixed => "mixed",
            FinancialConstraint::PaidAllowed => "paid_allowed",
        }
    }
}

impl FromStr for FinancialConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "free_only" | "free" => Ok(FinancialConstraint::FreeOnly),
            "mixed" => Ok(FinancialConstraint::Mixed),
            "paid_allowed" | "paid" => Ok(FinancialConstraint::PaidAllowed),
            _ => Err(format!("Invalid financial constraint: {s}")),
        }
    }
}

/// The learner's current situation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    Student,
    #[default]
    WorkingProfessional,
    CareerBreak,
    Transitioning,
}

impl Situation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Situation::Student => "student",
            Situation::WorkingProfessional => "working_professional",
            Situation::CareerBreak => "career_break",
            Situation::Transitioning => "transitioning",
        }
    }
}

impl FromStr for Situation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "student" => Ok(Situation::Student),
            "working" | "working_professional" => Ok(Situation::WorkingProfessional),
            "career_break" => Ok(Situation::CareerBreak),
            "transitioning" | "career_change" => Ok(Situation::Transitioning),
            _ => Err(format!("Invalid situation: {s}")),
        }
    }
}

/// Target timeline: a fixed number of weeks or open-ended.
///
/// Deadlines compare categorically; `Weeks(12)` parsed from "3 months" equals
/// `Weeks(12)` parsed from "12 weeks".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    #[default]
    Flexible,
    Weeks(u32),
}

impl Deadline {
    /// Week count, or `None` for a flexible deadline.
    pub fn weeks(&self) -> Option<u32> {
        match self {
            Deadline::Flexible => None,
            Deadline::Weeks(weeks) => Some(*weeks),
        }
    }

    /// Storage representation: `flexible` or `<n> weeks`.
    pub fn to_storage(&self) -> String {
        match self {
            Deadline::Flexible => "flexible".to_string(),
            Deadline::Weeks(weeks) => format!("{weeks} weeks"),
        }
    }
}

impl FromStr for Deadline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let weeks = match normalized.as_str() {
            "flexible" => return Ok(Deadline::Flexible),
            "3 months" => 12,
            "6 months" => 26,
            "1 year" => 52,
            other => other
                .strip_suffix("weeks")
                .or_else(|| other.strip_suffix("week"))
                .unwrap_or(other)
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid deadline: {s}"))?,
        };

        if weeks == 0 {
            return Err(format!("Invalid deadline: {s}"));
        }
        Ok(Deadline::Weeks(weeks))
    }
}
