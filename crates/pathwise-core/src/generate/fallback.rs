//! Deterministic roadmap generator used when the primary one is unavailable.

use log::info;

use super::{
    GenerationContext, GenerationPurpose, RebalanceContext, RebalanceSummary, RoadmapGenerator,
};
use crate::error::Result;
use crate::models::{Phase, RoadmapBody, UserProfile, Week};
use crate::sanitize::RawRoadmap;

/// Hours of study assumed for career readiness when no deadline is set.
pub const FALLBACK_TOTAL_HOURS: u32 = 200;

/// Shortest roadmap a timeline adjustment may produce.
pub const MIN_REBALANCED_WEEKS: u32 = 4;

const MIN_FLEXIBLE_WEEKS: u32 = 8;
const MAX_FLEXIBLE_WEEKS: u32 = 52;
const INTERVIEW_PREP_WEEKS: usize = 2;

const REBALANCE_MESSAGE: &str =
    "Your roadmap has been adjusted to match your new availability. Keep going!";

struct PhaseTemplate {
    name: &'static str,
    description: &'static str,
    focus: &'static str,
    tasks: [&'static str; 3],
    milestone: &'static str,
    success_metric: &'static str,
    /// Whether the closing weeks switch to interview preparation
    ends_with_interviews: bool,
}

const FOUNDATION: PhaseTemplate = PhaseTemplate {
    name: "Phase 1: Foundation",
    description: "Build core fundamentals",
    focus: "Core Skill",
    tasks: [
        "Study core concepts (3 hours)",
        "Practice exercises (2 hours)",
        "Mini project work (2 hours)",
    ],
    milestone: "Foundation milestone",
    success_metric: "Complete all tasks and exercises",
    ends_with_interviews: false,
};

const BUILDING: PhaseTemplate = PhaseTemplate {
    name: "Phase 2: Building",
    description: "Apply skills through projects",
    focus: "Applied Skill",
    tasks: [
        "Advanced concepts (2 hours)",
        "Project development (3 hours)",
        "Code review/debugging (2 hours)",
    ],
    milestone: "Building milestone",
    success_metric: "Working project component",
    ends_with_interviews: false,
};

const MASTERY: PhaseTemplate = PhaseTemplate {
    name: "Phase 3: Mastery & Interview Prep",
    description: "Polish skills and prepare for interviews",
    focus: "Advanced Topic",
    tasks: [
        "Portfolio refinement (2 hours)",
        "Interview practice (2 hours)",
        "Networking/applications (2 hours)",
    ],
    milestone: "Mastery milestone",
    success_metric: "Ready for interviews",
    ends_with_interviews: true,
};

const CONSOLIDATION: PhaseTemplate = PhaseTemplate {
    name: "Consolidation",
    description: "Reinforce earlier material",
    focus: "Consolidation & Review",
    tasks: [
        "Review previous material (2 hours)",
        "Practice weak areas (2 hours)",
        "Extend portfolio project (2 hours)",
    ],
    milestone: "Consolidation milestone",
    success_metric: "Earlier topics revisited and reinforced",
    ends_with_interviews: false,
};

/// Template-driven generator that never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Builds a roadmap for `context`, attaching a change report on rebalance.
    pub fn build(&self, context: &GenerationContext) -> RawRoadmap {
        match &context.purpose {
            GenerationPurpose::Initial => RawRoadmap::from(initial_body(&context.user)),
            GenerationPurpose::Rebalance(rebalance) => {
                if rebalance.roadmap.phases.iter().all(|p| p.weeks.is_empty()) {
                    return RawRoadmap::from(initial_body(&context.user));
                }
                let (body, summary) = rebalanced_body(&context.user, rebalance);
                let mut raw = RawRoadmap::from(body);
                raw.rebalance_summary = serde_json::to_value(summary).ok();
                raw
            }
        }
    }
}

impl RoadmapGenerator for FallbackGenerator {
    fn name(&self) -> &str {
        "fallback"
    }

    fn generate(&self, context: &GenerationContext) -> Result<RawRoadmap> {
        Ok(self.build(context))
    }
}

/// Roadmap length for a user without an existing plan.
pub(crate) fn initial_total_weeks(user: &UserProfile) -> u32 {
    match user.deadline.weeks() {
        Some(weeks) => weeks,
        None => (FALLBACK_TOTAL_HOURS / user.weekly_hours.max(1))
            .clamp(MIN_FLEXIBLE_WEEKS, MAX_FLEXIBLE_WEEKS),
    }
}

fn initial_body(user: &UserProfile) -> RoadmapBody {
    let total_weeks = initial_total_weeks(user);
    let foundation = total_weeks / 3;
    let building = total_weeks / 3;
    let mastery = total_weeks - foundation - building;

    let mut next_week = 1;
    let mut phases = Vec::new();
    for (template, count) in [(&FOUNDATION, foundation), (&BUILDING, building), (&MASTERY, mastery)] {
        if count == 0 {
            continue;
        }
        let count = count as usize;
        let weeks = (0..count)
            .map(|i| {
                let mut week = template.week(next_week + i as u32, i + 1);
                if template.ends_with_interviews && i + INTERVIEW_PREP_WEEKS >= count {
                    week.focus_skill = "Interview Preparation".to_string();
                }
                week
            })
            .collect();
        next_week += count as u32;
        phases.push(template.phase(weeks));
    }

    RoadmapBody {
        total_weeks,
        phases,
    }
}

impl PhaseTemplate {
    fn week(&self, week_number: u32, ordinal: usize) -> Week {
        Week {
            week_number,
            focus_skill: format!("{} {ordinal}", self.focus),
            tasks: self.tasks.iter().map(|task| (*task).to_string()).collect(),
            milestone: format!("{} {ordinal}", self.milestone),
            success_metric: self.success_metric.to_string(),
            resources: Vec::new(),
        }
    }

    fn phase(&self, weeks: Vec<Week>) -> Phase {
        Phase {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            weeks,
        }
    }
}

/// A week tagged with the index of the phase it belongs to.
struct PlacedWeek {
    phase: usize,
    week: Week,
}

/// Keeps the weeks up to the current one and resizes the rest.
fn rebalanced_body(user: &UserProfile, context: &RebalanceContext) -> (RoadmapBody, RebalanceSummary) {
    let roadmap = &context.roadmap;
    let old_total = roadmap.body().week_count() as u32;
    let current_week = roadmap.current_week.min(old_total);

    let (kept, remaining): (Vec<PlacedWeek>, Vec<PlacedWeek>) = roadmap
        .phases
        .iter()
        .enumerate()
        .flat_map(|(phase, p)| {
            p.weeks.iter().cloned().map(move |week| PlacedWeek { phase, week })
        })
        .partition(|placed| placed.week.week_number <= current_week);

    let old_remaining = remaining.len() as u32;
    let mut key_changes = Vec::new();
    let new_remaining =
        target_remaining_weeks(user, context, current_week, old_remaining, &mut key_changes);

    let (remaining, tasks_redistributed) = if new_remaining < old_remaining {
        let merged = merge_weeks(remaining, new_remaining as usize);
        key_changes.push(format!(
            "Merged {} weeks to fit the shorter timeline",
            old_remaining - new_remaining
        ));
        merged
    } else {
        let added = new_remaining - old_remaining;
        let mut extended = remaining;
        if added > 0 {
            let last_phase = roadmap.phases.len().saturating_sub(1);
            extended.extend((1..=added).map(|ordinal| PlacedWeek {
                phase: last_phase,
                week: CONSOLIDATION.week(0, ordinal as usize),
            }));
            key_changes.push(format!(
                "Added {added} consolidation weeks to the final phase"
            ));
        }
        (extended, 0)
    };

    if key_changes.is_empty() {
        key_changes.push("Kept the current timeline".to_string());
    }

    let mut phases: Vec<Phase> = roadmap
        .phases
        .iter()
        .map(|phase| Phase {
            name: phase.name.clone(),
            description: phase.description.clone(),
            weeks: Vec::new(),
        })
        .collect();
    for placed in kept.into_iter().chain(remaining) {
        phases[placed.phase].weeks.push(placed.week);
    }
    phases.retain(|phase| !phase.weeks.is_empty());

    let new_total = current_week + new_remaining;
    info!(
        "Fallback rebalance for user '{}': {} -> {} weeks",
        user.id, old_total, new_total
    );

    let body = RoadmapBody {
        total_weeks: new_total,
        phases,
    };
    let summary = RebalanceSummary {
        weeks_added_or_removed: i64::from(new_total) - i64::from(old_total),
        tasks_redistributed,
        key_changes,
        user_message: REBALANCE_MESSAGE.to_string(),
    };
    (body, summary)
}

/// Number of weeks after the current one in the rebalanced roadmap.
fn target_remaining_weeks(
    user: &UserProfile,
    context: &RebalanceContext,
    current_week: u32,
    old_remaining: u32,
    key_changes: &mut Vec<String>,
) -> u32 {
    let floor = |remaining: u32| {
        let remaining = if old_remaining > 0 { remaining.max(1) } else { remaining };
        remaining.max(MIN_REBALANCED_WEEKS.saturating_sub(current_week))
    };

    if context.deadline_changed {
        let total = initial_total_weeks(user);
        key_changes.push(format!("Timeline rebuilt for a {total}-week horizon"));
        return floor(total.saturating_sub(current_week));
    }

    if context.timeline_change_weeks != 0 {
        let change = context.timeline_change_weeks;
        let direction = if change > 0 { "extended" } else { "shortened" };
        key_changes.push(format!(
            "Timeline {direction} by {} weeks",
            change.unsigned_abs()
        ));
        let target = i64::from(old_remaining) + i64::from(change);
        return floor(u32::try_from(target.max(0)).unwrap_or(u32::MAX));
    }

    let before = context.previous_weekly_hours;
    let after = user.weekly_hours;
    if before > 0 && after > 0 && before != after {
        key_changes.push(format!(
            "Timeline adjusted based on new weekly hours ({before} -> {after} hours/week)"
        ));
        let scaled = u64::from(old_remaining) * u64::from(before) / u64::from(after);
        return floor(u32::try_from(scaled).unwrap_or(u32::MAX));
    }

    old_remaining
}

/// Folds `weeks` into `target` buckets, concatenating each bucket's tasks into
/// its first week. Returns the merged weeks and the number of moved tasks.
fn merge_weeks(weeks: Vec<PlacedWeek>, target: usize) -> (Vec<PlacedWeek>, u32) {
    let count = weeks.len();
    if target == 0 || target >= count {
        return (weeks, 0);
    }

    let mut merged: Vec<PlacedWeek> = Vec::with_capacity(target);
    let mut moved = 0;
    for (index, placed) in weeks.into_iter().enumerate() {
        let bucket = index * target / count;
        match merged.get_mut(bucket) {
            Some(head) => {
                moved += placed.week.tasks.len() as u32;
                absorb(&mut head.week, placed.week);
            }
            None => merged.push(placed),
        }
    }
    (merged, moved)
}

fn absorb(head: &mut Week, week: Week) {
    if !head.focus_skill.contains(&week.focus_skill) {
        head.focus_skill = format!("{} & {}", head.focus_skill, week.focus_skill);
    }
    head.tasks.extend(week.tasks);
    head.resources.extend(week.resources);
    head.milestone = week.milestone;
    head.success_metric = week.success_metric;
}
