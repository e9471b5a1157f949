//! Rebalance recommendation returned by the rule engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What caused a rebalance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceTrigger {
    MissedTasks,
    HoursChanged,
    DeadlineChanged,
    SituationChanged,
    AheadOfSchedule,
    /// Issued directly by the user; never produced by evaluation
    UserRequested,
}

impl RebalanceTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceTrigger::MissedTasks => "missed_tasks",
            RebalanceTrigger::HoursChanged => "hours_changed",
            RebalanceTrigger::DeadlineChanged => "deadline_changed",
            RebalanceTrigger::SituationChanged => "situation_changed",
            RebalanceTrigger::AheadOfSchedule => "ahead_of_schedule",
            RebalanceTrigger::UserRequested => "user_requested",
        }
    }

    /// Short human label used in rebalance reasons.
    pub fn label(&self) -> &'static str {
        match self {
            RebalanceTrigger::MissedTasks => "Missed tasks",
            RebalanceTrigger::HoursChanged => "Weekly hours changed",
            RebalanceTrigger::DeadlineChanged => "Deadline changed",
            RebalanceTrigger::SituationChanged => "Situation changed",
            RebalanceTrigger::AheadOfSchedule => "Ahead of schedule",
            RebalanceTrigger::UserRequested => "User requested",
        }
    }
}

impl FromStr for RebalanceTrigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "missed_tasks" => Ok(RebalanceTrigger::MissedTasks),
            "hours_changed" => Ok(RebalanceTrigger::HoursChanged),
            "deadline_changed" => Ok(RebalanceTrigger::DeadlineChanged),
            "situation_changed" => Ok(RebalanceTrigger::SituationChanged),
            "ahead_of_schedule" => Ok(RebalanceTrigger::AheadOfSchedule),
            "user_requested" => Ok(RebalanceTrigger::UserRequested),
            _ => Err(format!("Invalid rebalance trigger: {s}")),
        }
    }
}

/// Urgency of a recommendation.
///
/// Declaration order is the tie-break rank: `High` sorts first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    None,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::None => "none",
        }
    }
}

/// The engine's single decision for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebalanceRecommendation {
    pub should_rebalance: bool,
    /// `None` when nothing fired
    pub trigger: Option<RebalanceTrigger>,
    pub severity: Severity,
    pub message: String,
    pub suggested_actions: Vec<String>,
}

impl RebalanceRecommendation {
    /// The fixed result returned when no check fires.
    pub fn on_track() -> Self {
        Self {
            should_rebalance: false,
            trigger: None,
            severity: Severity::None,
            message: "You're on track! Keep up the great work.".to_string(),
            suggested_actions: Vec::new(),
        }
    }

    pub(crate) fn triggered(
        trigger: RebalanceTrigger,
        severity: Severity,
        message: impl Into<String>,
        suggested_actions: Vec<String>,
    ) -> Self {
        Self {
            should_rebalance: true,
            trigger: Some(trigger),
            severity,
            message: message.into(),
            suggested_actions,
        }
    }
}
