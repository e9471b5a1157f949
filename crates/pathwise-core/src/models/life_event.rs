//! Life-event shortcuts that map to a preset rebalance.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{MAX_WEEKLY_HOURS, MIN_WEEKLY_HOURS};

/// Something that happened in the learner's life and changes their capacity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LifeEvent {
    NewJob,
    MoreTime,
    FamilyCare,
    Burnout,
    MotivationHigh,
    HealthBreak,
    CareerPivot,
    Celebration,
}

impl LifeEvent {
    /// Every event, in menu order.
    pub fn all() -> [LifeEvent; 8] {
        [
            LifeEvent::NewJob,
            LifeEvent::MoreTime,
            LifeEvent::FamilyCare,
            LifeEvent::Burnout,
            LifeEvent::MotivationHigh,
            LifeEvent::HealthBreak,
            LifeEvent::CareerPivot,
            LifeEvent::Celebration,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeEvent::NewJob => "new_job",
            LifeEvent::MoreTime => "more_time",
            LifeEvent::FamilyCare => "family_care",
            LifeEvent::Burnout => "burnout",
            LifeEvent::MotivationHigh => "motivation_high",
            LifeEvent::HealthBreak => "health_break",
            LifeEvent::CareerPivot => "career_pivot",
            LifeEvent::Celebration => "celebration",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LifeEvent::NewJob => "Started New Job",
            LifeEvent::MoreTime => "More Free Time",
            LifeEvent::FamilyCare => "Family Responsibilities",
            LifeEvent::Burnout => "Feeling Overwhelmed",
            LifeEvent::MotivationHigh => "Highly Motivated",
            LifeEvent::HealthBreak => "Health/Medical",
            LifeEvent::CareerPivot => "Career Direction Change",
            LifeEvent::Celebration => "Milestone Achieved",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LifeEvent::NewJob => "Less time for learning, need to adjust pace",
            LifeEvent::MoreTime => "Can dedicate more hours weekly",
            LifeEvent::FamilyCare => "Need to reduce workload temporarily",
            LifeEvent::Burnout => "Need a lighter pace, self-care focus",
            LifeEvent::MotivationHigh => "Ready to push harder towards goal",
            LifeEvent::HealthBreak => "Need extended recovery time",
            LifeEvent::CareerPivot => "Want to adjust my goal path",
            LifeEvent::Celebration => "Just got a win worth celebrating!",
        }
    }

    /// Change to the weekly hour budget.
    pub fn hours_change(&self) -> i32 {
        match self {
            LifeEvent::NewJob => -5,
            LifeEvent::MoreTime => 5,
            LifeEvent::FamilyCare => -3,
            LifeEvent::Burnout => -4,
            LifeEvent::MotivationHigh => 3,
            LifeEvent::HealthBreak => -6,
            LifeEvent::CareerPivot | LifeEvent::Celebration => 0,
        }
    }

    /// Encouragement shown once the roadmap has been adapted.
    pub fn message(&self) -> &'static str {
        match self {
            LifeEvent::NewJob => "Congratulations on your new role! Let's slow down your learning pace while you settle in.",
            LifeEvent::MoreTime => "Great! Let's accelerate your learning and get you to your goal faster.",
            LifeEvent::FamilyCare => "Family comes first. We'll spread your tasks over more weeks so nothing feels rushed.",
            LifeEvent::Burnout => "It's okay to slow down. We're reducing your weekly load and adding buffer time.",
            LifeEvent::MotivationHigh => "Love the energy! Let's channel that motivation into faster progress.",
            LifeEvent::HealthBreak => "Your health is the priority. Take all the time you need - your roadmap will wait.",
            LifeEvent::CareerPivot => "Let's realign your roadmap with your new direction.",
            LifeEvent::Celebration => "Amazing! Let's celebrate this win and keep the momentum going!",
        }
    }

    /// New weekly hours for a learner currently at `current_hours`, or `None`
    /// when the event leaves the budget alone.
    ///
    /// ```rust
    /// use pathwise_core::models::LifeEvent;
    ///
    /// assert_eq!(LifeEvent::NewJob.adjusted_hours(10), Some(5));
    /// assert_eq!(LifeEvent::HealthBreak.adjusted_hours(6), Some(3));
    /// assert_eq!(LifeEvent::Celebration.adjusted_hours(10), None);
    /// ```
    pub fn adjusted_hours(&self, current_hours: u32) -> Option<u32> {
        let change = self.hours_change();
        if change == 0 {
            return None;
        }
        let adjusted = i64::from(current_hours) + i64::from(change);
        let clamped = adjusted.clamp(i64::from(MIN_WEEKLY_HOURS), i64::from(MAX_WEEKLY_HOURS));
        u32::try_from(clamped).ok()
    }

    /// Rebalance reason recorded on the new version.
    pub fn reason(&self) -> String {
        format!("Life Event: {} - {}", self.label(), self.description())
    }
}

impl FromStr for LifeEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        LifeEvent::all()
            .into_iter()
            .find(|event| event.as_str() == normalized)
            .ok_or_else(|| format!("Invalid life event: {s}"))
    }
}
