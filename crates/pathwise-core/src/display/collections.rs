//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use super::datetime::LocalDate;
use crate::{
    models::{LifeEvent, RoadmapVersion, Task},
    navigator::TaskList,
};

/// Newtype wrapper for a user's version history, most recent first.
///
/// ```rust
/// use pathwise_core::{display::RoadmapHistory, models::RoadmapVersion};
/// use jiff::Timestamp;
///
/// let version = RoadmapVersion {
///     id: 2,
///     user_id: "ada".to_string(),
///     version: Timestamp::now(),
///     total_weeks: 14,
///     current_week: 3,
///     phases: vec![],
///     is_active: true,
///     rebalance_reason: Some("Life Event: More Free Time".to_string()),
///     last_rebalanced_at: None,
/// };
///
/// let output = RoadmapHistory(vec![version]).to_string();
/// assert!(output.contains("Version 2 (active)"));
/// ```
pub struct RoadmapHistory(pub Vec<RoadmapVersion>);

impl RoadmapHistory {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for RoadmapHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No roadmap versions found.");
        }

        for version in &self.0 {
            let state = if version.is_active { " (active)" } else { "" };
            writeln!(f, "## Version {}{state}", version.id)?;
            writeln!(f)?;
            writeln!(f, "- Created: {}", LocalDate(&version.version))?;
            writeln!(
                f,
                "- Week {} of {}",
                version.current_week, version.total_weeks
            )?;
            writeln!(
                f,
                "- Reason: {}",
                version
                    .rebalance_reason
                    .as_deref()
                    .unwrap_or("Initial generation")
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a flat list of tasks.
pub struct Tasks<'a>(pub &'a [Task]);

impl fmt::Display for Tasks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.week {
            Some(week) => writeln!(f, "# Tasks for week {week} (roadmap {})", self.roadmap_id)?,
            None => writeln!(f, "# Tasks (roadmap {})", self.roadmap_id)?,
        }
        writeln!(f)?;
        write!(f, "{}", Tasks(&self.tasks))
    }
}

/// The life-event menu with each event's effect on weekly hours.
pub struct LifeEvents;

impl fmt::Display for LifeEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in LifeEvent::all() {
            let hours = match event.hours_change() {
                0 => "hours unchanged".to_string(),
                change => format!("{change:+} hours/week"),
            };
            writeln!(
                f,
                "- `{}` {}: {} ({hours})",
                event.as_str(),
                event.label(),
                event.description()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collections() {
        assert_eq!(RoadmapHistory(vec![]).to_string(), "No roadmap versions found.\n");
        assert_eq!(Tasks(&[]).to_string(), "No tasks found.\n");
    }

    #[test]
    fn test_life_event_menu() {
        let output = LifeEvents.to_string();
        assert_eq!(output.lines().count(), 8);
        assert!(output.contains("- `new_job` Started New Job"));
        assert!(output.contains("(-5 hours/week)"));
        assert!(output.contains("`celebration` Milestone Achieved: Just got a win worth celebrating! (hours unchanged)"));
    }
}
