//! Rule engine deciding whether a roadmap should be rebalanced.
//!
//! The engine is pure: it reads a [`ProgressSnapshot`], the current
//! [`UserProfile`], the active [`RoadmapVersion`] and optionally the profile
//! as it was before an edit, and returns one [`RebalanceRecommendation`].
//!
//! Five checks run in a fixed order:
//!
//! 1. missed tasks (`medium`, or `high` past the high-water mark)
//! 2. ahead of schedule (`low`)
//! 3. weekly hours changed (`medium`, needs the previous profile)
//! 4. deadline changed (`high`, needs the previous profile)
//! 5. situation changed (`medium`, needs the previous profile)
//!
//! When several fire, the most severe wins and ties go to the check that ran
//! first.
//!
//! ```rust
//! use pathwise_core::rules::{RuleEngine, Thresholds};
//!
//! let engine = RuleEngine::new(Thresholds {
//!     missed_percent: 25.0,
//!     ..Thresholds::default()
//! });
//! assert_eq!(engine.thresholds().ahead_percent, 20.0);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{expected_percentage, ProgressSnapshot, RoadmapVersion, UserProfile};

pub mod recommendation;

#[cfg(test)]
mod tests;

pub use recommendation::{RebalanceRecommendation, RebalanceTrigger, Severity};

/// Percentages at which the checks fire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    /// Missed share of all tasks that triggers a rebalance
    pub missed_percent: f64,
    /// Missed share at which the missed-tasks severity becomes high
    pub missed_high_percent: f64,
    /// Points above the expected completion that count as ahead
    pub ahead_percent: f64,
    /// Relative change in weekly hours that triggers a rebalance
    pub hours_change_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            missed_percent: 30.0,
            missed_high_percent: 50.0,
            ahead_percent: 20.0,
            hours_change_percent: 25.0,
        }
    }
}

/// Stateless evaluator over progress and profile changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine {
    thresholds: Thresholds,
}

impl RuleEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Runs every applicable check and returns the single most severe result.
    pub fn evaluate(
        &self,
        progress: &ProgressSnapshot,
        user: &UserProfile,
        roadmap: &RoadmapVersion,
        previous_user: Option<&UserProfile>,
    ) -> RebalanceRecommendation {
        let mut candidates = Vec::new();
        candidates.extend(self.check_missed_tasks(progress));
        candidates.extend(self.check_ahead_of_schedule(progress, roadmap));

        if let Some(previous) = previous_user {
            candidates.extend(self.check_hours_change(user, previous));
            candidates.extend(check_deadline_change(user, previous));
            candidates.extend(check_situation_change(user, previous));
        }

        // min_by_key keeps the first of equal minima, so evaluation order
        // breaks severity ties.
        let decision = candidates
            .into_iter()
            .min_by_key(|candidate| candidate.severity)
            .unwrap_or_else(RebalanceRecommendation::on_track);

        debug!(
            "rule engine for user '{}': trigger={:?} severity={}",
            user.id,
            decision.trigger,
            decision.severity.as_str()
        );
        decision
    }

    fn check_missed_tasks(&self, progress: &ProgressSnapshot) -> Option<RebalanceRecommendation> {
        if progress.total_tasks_count == 0 {
            return None;
        }

        let missed_percent = f64::from(progress.missed_tasks_count)
            / f64::from(progress.total_tasks_count)
            * 100.0;
        if missed_percent < self.thresholds.missed_percent {
            return None;
        }

        let severity = if missed_percent >= self.thresholds.missed_high_percent {
            Severity::High
        } else {
            Severity::Medium
        };

        Some(RebalanceRecommendation::triggered(
            RebalanceTrigger::MissedTasks,
            severity,
            format!(
                "You've missed {missed_percent:.0}% of tasks. Let's adjust your roadmap to be more achievable."
            ),
            actions(&[
                "Extend your timeline to reduce weekly workload",
                "Focus on the highest priority skills only",
                "Break tasks into smaller, more manageable pieces",
                "Consider if your weekly hours estimate is realistic",
            ]),
        ))
    }

    fn check_ahead_of_schedule(
        &self,
        progress: &ProgressSnapshot,
        roadmap: &RoadmapVersion,
    ) -> Option<RebalanceRecommendation> {
        if roadmap.total_weeks == 0 {
            return None;
        }

        let expected = expected_percentage(roadmap.current_week, roadmap.total_weeks);
        if progress.completion_percentage < expected + self.thresholds.ahead_percent {
            return None;
        }

        Some(RebalanceRecommendation::triggered(
            RebalanceTrigger::AheadOfSchedule,
            Severity::Low,
            "Amazing progress! You're ahead of schedule. Would you like to add advanced topics?",
            actions(&[
                "Add an optional advanced mini-project",
                "Dive deeper into a topic you're interested in",
                "Start interview prep earlier",
                "Keep current pace and finish early",
            ]),
        ))
    }

    fn check_hours_change(
        &self,
        user: &UserProfile,
        previous: &UserProfile,
    ) -> Option<RebalanceRecommendation> {
        if previous.weekly_hours == 0 {
            return None;
        }

        let current = f64::from(user.weekly_hours);
        let before = f64::from(previous.weekly_hours);
        let change_percent = (current - before).abs() / before * 100.0;
        if change_percent < self.thresholds.hours_change_percent {
            return None;
        }

        let direction = if user.weekly_hours > previous.weekly_hours {
            "increased"
        } else {
            "decreased"
        };

        Some(RebalanceRecommendation::triggered(
            RebalanceTrigger::HoursChanged,
            Severity::Medium,
            format!("Your weekly hours {direction}. Let's adjust your roadmap accordingly."),
            vec![
                format!("Recalculate timeline based on {} hours/week", user.weekly_hours),
                "Redistribute remaining tasks".to_string(),
                "Update milestones and deadlines".to_string(),
            ],
        ))
    }
}

fn check_deadline_change(
    user: &UserProfile,
    previous: &UserProfile,
) -> Option<RebalanceRecommendation> {
    (user.deadline != previous.deadline).then(|| {
        RebalanceRecommendation::triggered(
            RebalanceTrigger::DeadlineChanged,
            Severity::High,
            "Your timeline has changed. Let's rebuild your roadmap.",
            actions(&[
                "Regenerate roadmap with new deadline",
                "Adjust task distribution",
                "Reprioritize remaining skills",
            ]),
        )
    })
}

fn check_situation_change(
    user: &UserProfile,
    previous: &UserProfile,
) -> Option<RebalanceRecommendation> {
    (user.situation != previous.situation).then(|| {
        RebalanceRecommendation::triggered(
            RebalanceTrigger::SituationChanged,
            Severity::Medium,
            "Your situation has changed. Let's adjust your plan to fit your new circumstances.",
            actions(&[
                "Review and adjust weekly hours",
                "Consider new time constraints or opportunities",
                "Update resource recommendations",
            ]),
        )
    })
}

fn actions(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
