//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can render it with termimad and the MCP
//! server can hand it to agents unchanged.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    generate::GenerationSource,
    models::{
        Deadline, FinancialConstraint, LifeEvent, PaceStatus, ProgressSnapshot, RoadmapVersion,
        Situation, SkillLevel, Task, TaskStatus, UserProfile, Week,
    },
    rules::{RebalanceRecommendation, RebalanceTrigger, Severity},
};

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    TaskStatus,
    PaceStatus,
    SkillLevel,
    FinancialConstraint,
    Situation,
    RebalanceTrigger,
    Severity,
    LifeEvent,
    GenerationSource,
);

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage())
    }
}

impl PaceStatus {
    /// Human label with an indicator.
    pub fn with_icon(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "🚀 Ahead",
            PaceStatus::OnTrack => "✓ On track",
            PaceStatus::SlightlyBehind => "⚠ Slightly behind",
            PaceStatus::Behind => "✗ Behind",
        }
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- Target role: {}", self.target_role)?;
        writeln!(f, "- Skill level: {}", self.skill_level)?;
        writeln!(f, "- Weekly hours: {}", self.weekly_hours)?;
        writeln!(f, "- Deadline: {}", self.deadline)?;
        writeln!(f, "- Budget: {}", self.financial_constraint)?;
        writeln!(f, "- Situation: {}", self.situation)?;
        if let Some(email) = &self.email {
            writeln!(f, "- Email: {email}")?;
        }
        match self.active_roadmap_id {
            Some(id) => writeln!(f, "- Active roadmap: {id}")?,
            None => writeln!(f, "- Active roadmap: none")?,
        }
        writeln!(
            f,
            "- Onboarding: {}",
            if self.onboarding_completed { "completed" } else { "pending" }
        )?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.background.trim().is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.background.trim())?;
        }
        Ok(())
    }
}

impl Week {
    /// Formats the week with `marker` appended to its heading.
    pub(crate) fn fmt_week(&self, f: &mut fmt::Formatter<'_>, marker: &str) -> fmt::Result {
        writeln!(f, "### Week {}: {}{marker}", self.week_number, self.focus_skill)?;
        writeln!(f)?;
        for task in &self.tasks {
            writeln!(f, "- {task}")?;
        }
        if !self.tasks.is_empty() {
            writeln!(f)?;
        }
        writeln!(f, "**Milestone**: {}", self.milestone)?;
        writeln!(f)?;
        writeln!(f, "**Success metric**: {}", self.success_metric)?;
        writeln!(f)?;

        if !self.resources.is_empty() {
            writeln!(f, "#### Resources")?;
            writeln!(f)?;
            for resource in &self.resources {
                match &resource.url {
                    Some(url) if *url != resource.title => {
                        writeln!(f, "- [{}]({url})", resource.title)?
                    }
                    _ => writeln!(f, "- {}", resource.title)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_week(f, "")
    }
}

impl fmt::Display for RoadmapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Roadmap {} for {}", self.id, self.user_id)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Status: {}",
            if self.is_active { "active" } else { "inactive" }
        )?;
        writeln!(f, "- Week: {} of {}", self.current_week, self.total_weeks)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.version))?;
        if let Some(reason) = &self.rebalance_reason {
            writeln!(f, "- Rebalance reason: {reason}")?;
        }
        if let Some(at) = &self.last_rebalanced_at {
            writeln!(f, "- Rebalanced: {}", LocalDateTime(at))?;
        }

        if self.phases.is_empty() {
            return writeln!(f, "\nThis roadmap has no weeks.");
        }

        for phase in &self.phases {
            writeln!(f)?;
            writeln!(f, "## {}", phase.name)?;
            writeln!(f)?;
            if let Some(description) = &phase.description {
                writeln!(f, "{description}")?;
                writeln!(f)?;
            }
            for week in &phase.weeks {
                let marker = if week.week_number == self.current_week {
                    " (current)"
                } else {
                    ""
                };
                week.fmt_week(f, marker)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {}. {} ({}, week {})",
            self.id,
            self.title,
            self.status.with_icon(),
            self.week_number
        )
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Progress for {}", self.user_id)?;
        writeln!(f)?;
        writeln!(f, "- Roadmap: {}", self.roadmap_id)?;
        writeln!(f, "- Week: {} of {}", self.current_week, self.total_weeks)?;
        writeln!(
            f,
            "- Completed: {}/{} ({:.1}%)",
            self.completed_tasks_count, self.total_tasks_count, self.completion_percentage
        )?;
        writeln!(f, "- Skipped: {}", self.missed_tasks_count)?;
        writeln!(f, "- Pending: {}", self.pending_tasks_count())?;
        writeln!(f, "- Expected: {:.1}%", self.expected_percentage)?;
        writeln!(f, "- Pace: {}", self.pace_status.with_icon())?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.last_updated))
    }
}

impl fmt::Display for RebalanceRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.should_rebalance {
            writeln!(f, "# No rebalance needed")?;
            writeln!(f)?;
            return writeln!(f, "{}", self.message);
        }

        let trigger = self.trigger.map_or("Rebalance", |trigger| trigger.label());
        writeln!(f, "# Rebalance recommended: {trigger}")?;
        writeln!(f)?;
        writeln!(f, "- Severity: {}", self.severity)?;
        writeln!(f)?;
        writeln!(f, "{}", self.message)?;

        if !self.suggested_actions.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Suggested actions")?;
            writeln!(f)?;
            for action in &self.suggested_actions {
                writeln!(f, "- {action}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Phase, Resource};

    fn week(number: u32) -> Week {
        Week {
            week_number: number,
            focus_skill: "SQL".to_string(),
            tasks: vec!["Joins".to_string()],
            milestone: "Query a dataset".to_string(),
            success_metric: "Ten queries written".to_string(),
            resources: vec![Resource {
                title: "SQLBolt".to_string(),
                url: Some("https://sqlbolt.com".to_string()),
            }],
        }
    }

    #[test]
    fn test_roadmap_marks_current_week() {
        let roadmap = RoadmapVersion {
            id: 3,
            user_id: "ada".to_string(),
            version: Timestamp::now(),
            total_weeks: 2,
            current_week: 2,
            phases: vec![Phase {
                name: "Foundation".to_string(),
                description: None,
                weeks: vec![week(1), week(2)],
            }],
            is_active: true,
            rebalance_reason: Some("Life Event: Burnout".to_string()),
            last_rebalanced_at: None,
        };

        let output = roadmap.to_string();
        assert!(output.contains("# Roadmap 3 for ada"));
        assert!(output.contains("- Week: 2 of 2"));
        assert!(output.contains("### Week 2: SQL (current)"));
        assert!(!output.contains("### Week 1: SQL (current)"));
        assert!(output.contains("- [SQLBolt](https://sqlbolt.com)"));
        assert!(output.contains("Rebalance reason: Life Event: Burnout"));
    }

    #[test]
    fn test_recommendation_display() {
        let quiet = RebalanceRecommendation::on_track();
        assert!(quiet.to_string().contains("No rebalance needed"));

        let loud = RebalanceRecommendation::triggered(
            RebalanceTrigger::DeadlineChanged,
            Severity::High,
            "Your deadline changed.",
            vec!["Rebuild the plan".to_string()],
        );
        let output = loud.to_string();
        assert!(output.contains("Rebalance recommended: Deadline changed"));
        assert!(output.contains("- Severity: high"));
        assert!(output.contains("- Rebuild the plan"));
    }

    #[test]
    fn test_enum_display_uses_storage_names() {
        assert_eq!(TaskStatus::Skipped.to_string(), "skipped");
        assert_eq!(Deadline::Weeks(12).to_string(), "12 weeks");
        assert_eq!(Situation::CareerBreak.to_string(), "career_break");
        assert_eq!(LifeEvent::MoreTime.to_string(), "more_time");
    }
}
