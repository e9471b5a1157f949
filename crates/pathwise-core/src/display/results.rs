//! Display implementations for navigator operation results.

use std::fmt;

use super::collections::Tasks;
use crate::{
    models::UserProfile,
    navigator::{ProfileUpdate, ProgressReport, RebalanceCheck, RoadmapUpdate, WeekView},
};

/// Wrapper type for displaying a newly saved profile.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<UserProfile> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved user '{}'", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before, after) = (&self.previous, &self.current);
        let mut changes = Vec::new();
        if before.weekly_hours != after.weekly_hours {
            changes.push(format!(
                "Weekly hours: {} → {}",
                before.weekly_hours, after.weekly_hours
            ));
        }
        if before.deadline != after.deadline {
            changes.push(format!("Deadline: {} → {}", before.deadline, after.deadline));
        }
        if before.situation != after.situation {
            changes.push(format!(
                "Situation: {} → {}",
                before.situation, after.situation
            ));
        }
        if before.target_role != after.target_role {
            changes.push(format!(
                "Target role: {} → {}",
                before.target_role, after.target_role
            ));
        }
        if before.skill_level != after.skill_level {
            changes.push(format!(
                "Skill level: {} → {}",
                before.skill_level, after.skill_level
            ));
        }

        writeln!(f, "Updated user '{}'", after.id)?;
        writeln!(f)?;
        if !changes.is_empty() {
            writeln!(f, "Changes made:")?;
            for change in &changes {
                writeln!(f, "- {change}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{after}")
    }
}

impl fmt::Display for RoadmapUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.replaced {
            Some(previous) => writeln!(
                f,
                "Rebalanced roadmap {previous} into version {} ({} generator)",
                self.roadmap.id, self.source
            )?,
            None => writeln!(
                f,
                "Created roadmap {} ({} generator)",
                self.roadmap.id, self.source
            )?,
        }
        writeln!(f)?;

        if let Some(message) = &self.message {
            writeln!(f, "> {message}")?;
            writeln!(f)?;
        }

        if let Some(summary) = &self.summary {
            if summary.weeks_added_or_removed != 0 {
                writeln!(
                    f,
                    "- Weeks added/removed: {:+}",
                    summary.weeks_added_or_removed
                )?;
            }
            if summary.tasks_redistributed > 0 {
                writeln!(f, "- Tasks redistributed: {}", summary.tasks_redistributed)?;
            }
            for change in &summary.key_changes {
                writeln!(f, "- {change}")?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", self.roadmap)
    }
}

impl fmt::Display for WeekView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# Week {} of {}: {}",
            self.week.week_number, self.total_weeks, self.phase_name
        )?;
        writeln!(f)?;
        write!(f, "{}", self.week)?;
        writeln!(f, "## Tasks")?;
        writeln!(f)?;
        write!(f, "{}", Tasks(&self.tasks))
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.snapshot)?;
        writeln!(
            f,
            "- Skipped in the last two weeks: {:.0}%",
            self.recent_missed_percentage
        )
    }
}

impl fmt::Display for RebalanceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.recommendation)?;
        if let Some(update) = &self.update {
            writeln!(f)?;
            write!(f, "{update}")?;
        }
        Ok(())
    }
}
