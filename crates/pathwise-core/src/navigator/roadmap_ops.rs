//! Roadmap version operations for the Navigator.

use log::info;

use super::Navigator;
use crate::{
    error::{PathwiseError, Result},
    generate::{GenerationContext, GenerationSource, RebalanceSummary},
    models::{NewRoadmapVersion, ProgressSnapshot, RoadmapVersion, Task, UserProfile, Week},
    params::{GenerateRoadmap, SetWeek, UserId},
    rules::RebalanceTrigger,
    store::RoadmapStore,
};

/// A newly created roadmap version and how it came about.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapUpdate {
    pub roadmap: RoadmapVersion,
    /// The version this one replaced, if any
    pub replaced: Option<u64>,
    pub source: GenerationSource,
    pub trigger: Option<RebalanceTrigger>,
    pub summary: Option<RebalanceSummary>,
    /// Note for the learner
    pub message: Option<String>,
}

/// The current week of the active roadmap with its tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    pub roadmap_id: u64,
    pub total_weeks: u32,
    pub phase_name: String,
    pub week: Week,
    pub tasks: Vec<Task>,
}

pub(super) fn require_user(store: &dyn RoadmapStore, user_id: &str) -> Result<UserProfile> {
    store
        .get_user(user_id)?
        .ok_or_else(|| PathwiseError::UserNotFound {
            id: user_id.to_string(),
        })
}

/// Loads the active version. A pointer to a missing version is reported as
/// `RoadmapNotFound` rather than as no roadmap at all.
pub(super) fn require_active(store: &dyn RoadmapStore, user_id: &str) -> Result<RoadmapVersion> {
    let user = require_user(store, user_id)?;
    if let Some(roadmap) = store.get_active(user_id)? {
        return Ok(roadmap);
    }
    Err(match user.active_roadmap_id {
        Some(id) => PathwiseError::RoadmapNotFound { id },
        None => PathwiseError::NoActiveRoadmap {
            user_id: user_id.to_string(),
        },
    })
}

/// Recomputes the snapshot for `roadmap` from its tasks and caches it.
pub(super) fn refresh_progress(
    store: &dyn RoadmapStore,
    roadmap: &RoadmapVersion,
) -> Result<ProgressSnapshot> {
    let tasks = store.get_tasks(roadmap.id, None)?;
    let snapshot = ProgressSnapshot::from_tasks(roadmap, &tasks);
    store.save_progress(&snapshot)?;
    Ok(snapshot)
}

impl Navigator {
    /// Creates the first roadmap for a user and completes onboarding.
    ///
    /// Fails with `InvalidInput` when the user already has an active roadmap;
    /// later versions come from rebalancing.
    pub async fn generate_roadmap(&self, params: &GenerateRoadmap) -> Result<RoadmapUpdate> {
        let user_id = params.user_id.clone();
        let user = self
            .with_store(move |store| {
                let user = require_user(store, &user_id)?;
                if user.active_roadmap_id.is_some() {
                    return Err(PathwiseError::invalid_input("user_id").with_reason(format!(
                        "User '{user_id}' already has a roadmap; rebalance it instead"
                    )));
                }
                Ok(user)
            })
            .await?;

        let generated = self
            .generate(GenerationContext::initial(user.clone()), params.roadmap.clone())
            .await?;
        let source = generated.source;
        let body = generated.body;

        let roadmap = self
            .with_store(move |store| {
                let roadmap = store.create_version(&user.id, &NewRoadmapVersion::initial(body))?;
                store.upsert_user(&UserProfile {
                    onboarding_completed: true,
                    ..user
                })?;
                refresh_progress(store, &roadmap)?;
                Ok(roadmap)
            })
            .await?;

        info!(
            "Generated {}-week roadmap {} for user '{}' ({} generator)",
            roadmap.total_weeks,
            roadmap.id,
            roadmap.user_id,
            source.as_str()
        );

        Ok(RoadmapUpdate {
            roadmap,
            replaced: None,
            source,
            trigger: None,
            summary: None,
            message: None,
        })
    }

    /// Retrieves the active roadmap version.
    pub async fn active_roadmap(&self, params: &UserId) -> Result<RoadmapVersion> {
        let user_id = params.user_id.clone();
        self.with_store(move |store| require_active(store, &user_id))
            .await
    }

    /// Lists every version of the user, most recent first.
    pub async fn roadmap_history(&self, params: &UserId) -> Result<Vec<RoadmapVersion>> {
        let user_id = params.user_id.clone();
        self.with_store(move |store| {
            require_user(store, &user_id)?;
            store.get_history(&user_id)
        })
        .await
    }

    /// Shows the week the active roadmap's pointer is on.
    pub async fn current_week(&self, params: &UserId) -> Result<WeekView> {
        let user_id = params.user_id.clone();
        self.with_store(move |store| {
            let roadmap = require_active(store, &user_id)?;
            let (phase_name, week) = roadmap
                .phases
                .iter()
                .flat_map(|phase| phase.weeks.iter().map(move |week| (phase, week)))
                .find(|(_, week)| week.week_number == roadmap.current_week)
                .map(|(phase, week)| (phase.name.clone(), week.clone()))
                .ok_or_else(|| {
                    PathwiseError::invalid_input("current_week").with_reason(format!(
                        "Roadmap {} has no week {}",
                        roadmap.id, roadmap.current_week
                    ))
                })?;
            let tasks = store.get_tasks(roadmap.id, Some(week.week_number))?;

            Ok(WeekView {
                roadmap_id: roadmap.id,
                total_weeks: roadmap.total_weeks,
                phase_name,
                week,
                tasks,
            })
        })
        .await
    }

    /// Moves the active roadmap's week pointer, clamped to the roadmap.
    /// Returns `false` when the user has no active roadmap.
    pub async fn set_current_week(&self, params: &SetWeek) -> Result<bool> {
        let user_id = params.user_id.clone();
        let week = params.week;

        self.with_store(move |store| {
            require_user(store, &user_id)?;
            if !store.set_current_week(&user_id, week)? {
                return Ok(false);
            }
            if let Some(roadmap) = store.get_active(&user_id)? {
                refresh_progress(store, &roadmap)?;
            }
            Ok(true)
        })
        .await
    }

    /// Advances the week pointer by one, stopping at the final week.
    pub async fn advance_week(&self, params: &UserId) -> Result<RoadmapVersion> {
        let user_id = params.user_id.clone();

        self.with_store(move |store| {
            let roadmap = require_active(store, &user_id)?;
            store.set_current_week(&user_id, roadmap.current_week.saturating_add(1))?;
            let advanced = require_active(store, &user_id)?;
            refresh_progress(store, &advanced)?;
            Ok(advanced)
        })
        .await
    }
}
