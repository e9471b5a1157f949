//! Validated request types for state-changing operations.

use super::{Deadline, LifeEvent};
use crate::rules::RebalanceTrigger;

/// A request to replace the active roadmap with a new version.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceRequest {
    pub trigger: RebalanceTrigger,
    /// Free-text reason; a default is composed when absent
    pub reason: Option<String>,
    pub new_weekly_hours: Option<u32>,
    pub new_deadline: Option<Deadline>,
    /// Requested change to the total length, in weeks
    pub timeline_change_weeks: i32,
    pub life_event: Option<LifeEvent>,
    /// Generator output captured outside the engine, used as the primary body
    pub roadmap_text: Option<String>,
}

impl RebalanceRequest {
    /// A bare user-requested rebalance with nothing changed.
    pub fn user_requested() -> Self {
        Self::triggered_by(RebalanceTrigger::UserRequested)
    }

    pub fn triggered_by(trigger: RebalanceTrigger) -> Self {
        Self {
            trigger,
            reason: None,
            new_weekly_hours: None,
            new_deadline: None,
            timeline_change_weeks: 0,
            life_event: None,
            roadmap_text: None,
        }
    }

    /// The preset rebalance for a life event.
    pub fn life_event(event: LifeEvent) -> Self {
        Self {
            life_event: Some(event),
            ..Self::user_requested()
        }
    }

    /// Reason stored on the new version.
    ///
    /// Life events use their fixed wording. Otherwise the caller's reason (or
    /// a generic one) is followed by the hour and timeline changes.
    ///
    /// ```rust
    /// use pathwise_core::models::RebalanceRequest;
    ///
    /// let request = RebalanceRequest {
    ///     new_weekly_hours: Some(6),
    ///     timeline_change_weeks: 2,
    ///     ..RebalanceRequest::user_requested()
    /// };
    /// assert_eq!(
    ///     request.compose_reason(10),
    ///     "User requested rebalance | Hours: 10 → 6 | Timeline: +2 weeks"
    /// );
    /// ```
    pub fn compose_reason(&self, previous_weekly_hours: u32) -> String {
        if let Some(event) = self.life_event {
            return self.reason.clone().unwrap_or_else(|| event.reason());
        }

        let mut reason = match self.reason.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => "User requested rebalance".to_string(),
        };
        if let Some(hours) = self.new_weekly_hours {
            if hours != previous_weekly_hours {
                reason.push_str(&format!(" | Hours: {previous_weekly_hours} → {hours}"));
            }
        }
        if let Some(deadline) = self.new_deadline {
            reason.push_str(&format!(" | Deadline: {}", deadline.to_storage()));
        }
        if self.timeline_change_weeks != 0 {
            reason.push_str(&format!(" | Timeline: {:+} weeks", self.timeline_change_weeks));
        }
        reason
    }
}
