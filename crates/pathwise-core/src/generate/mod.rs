//! Roadmap generation collaborators and the regeneration pipeline.
//!
//! A [`RoadmapGenerator`] produces a loose [`RawRoadmap`] for a
//! [`GenerationContext`]. The [`RegenerationPipeline`] asks the primary
//! generator first, falls back to the deterministic [`FallbackGenerator`]
//! exactly once when the primary fails or produces no weeks, and always runs
//! the result through [`sanitize`].

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ProgressSnapshot, RoadmapBody, RoadmapVersion, UserProfile};
use crate::rules::RebalanceTrigger;
use crate::sanitize::{sanitize, RawRoadmap};

mod fallback;
mod response;

#[cfg(test)]
mod tests;

pub use fallback::{FallbackGenerator, FALLBACK_TOTAL_HOURS, MIN_REBALANCED_WEEKS};
pub use response::ResponseGenerator;

/// Produces roadmap bodies of untrusted shape.
///
/// Implementations may block; the navigator calls them from a blocking task.
pub trait RoadmapGenerator: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    fn generate(&self, context: &GenerationContext) -> Result<RawRoadmap>;
}

/// Everything a generator may use to build a roadmap.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Profile as it will be stored alongside the new version
    pub user: UserProfile,
    pub purpose: GenerationPurpose,
}

#[derive(Debug, Clone)]
pub enum GenerationPurpose {
    /// First roadmap after onboarding
    Initial,
    /// Replacement for the active roadmap
    Rebalance(RebalanceContext),
}

/// State of the roadmap being replaced.
#[derive(Debug, Clone)]
pub struct RebalanceContext {
    pub roadmap: RoadmapVersion,
    pub progress: ProgressSnapshot,
    pub trigger: RebalanceTrigger,
    pub reason: String,
    /// Weekly hours before this rebalance
    pub previous_weekly_hours: u32,
    /// Whether the deadline changed with this rebalance
    pub deadline_changed: bool,
    /// Requested change to the total length, in weeks
    pub timeline_change_weeks: i32,
}

impl GenerationContext {
    pub fn initial(user: UserProfile) -> Self {
        Self {
            user,
            purpose: GenerationPurpose::Initial,
        }
    }

    pub fn rebalance(user: UserProfile, rebalance: RebalanceContext) -> Self {
        Self {
            user,
            purpose: GenerationPurpose::Rebalance(rebalance),
        }
    }
}

/// What changed in a rebalanced roadmap, as reported to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceSummary {
    #[serde(default)]
    pub weeks_added_or_removed: i64,
    #[serde(default)]
    pub tasks_redistributed: u32,
    #[serde(default)]
    pub key_changes: Vec<String>,
    #[serde(default)]
    pub user_message: String,
}

/// Which generator produced a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Primary,
    Fallback,
}

impl GenerationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationSource::Primary => "primary",
            GenerationSource::Fallback => "fallback",
        }
    }
}

/// A sanitized body ready to be stored as a new version.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRoadmap {
    pub body: RoadmapBody,
    pub source: GenerationSource,
    pub summary: Option<RebalanceSummary>,
}

/// Primary generator with a one-shot deterministic fallback.
#[derive(Clone, Default)]
pub struct RegenerationPipeline {
    primary: Option<Arc<dyn RoadmapGenerator>>,
    fallback: FallbackGenerator,
}

impl RegenerationPipeline {
    pub fn new(primary: Option<Arc<dyn RoadmapGenerator>>) -> Self {
        Self {
            primary,
            fallback: FallbackGenerator,
        }
    }

    pub fn primary(&self) -> Option<&Arc<dyn RoadmapGenerator>> {
        self.primary.as_ref()
    }

    /// Runs the pipeline. Never fails: the fallback always yields a body.
    pub fn run(&self, context: &GenerationContext) -> GeneratedRoadmap {
        if let Some(primary) = &self.primary {
            match primary.generate(context) {
                Ok(raw) => {
                    let generated = finish(raw, GenerationSource::Primary);
                    if generated.body.week_count() > 0 {
                        debug!(
                            "generator '{}' produced {} weeks for user '{}'",
                            primary.name(),
                            generated.body.week_count(),
                            context.user.id
                        );
                        return generated;
                    }
                    warn!(
                        "Generator '{}' returned a roadmap without weeks; using fallback",
                        primary.name()
                    );
                }
                Err(e) => {
                    warn!("Generator '{}' failed: {e}; using fallback", primary.name());
                }
            }
        }

        finish(self.fallback.build(context), GenerationSource::Fallback)
    }
}

fn finish(mut raw: RawRoadmap, source: GenerationSource) -> GeneratedRoadmap {
    let summary = raw
        .rebalance_summary
        .take()
        .and_then(|value| serde_json::from_value(value).ok());
    GeneratedRoadmap {
        body: sanitize(raw),
        source,
        summary,
    }
}
