//! Progress, rebalance evaluation and rebalancing for the Navigator.

use jiff::Timestamp;
use log::info;

use super::{
    roadmap_ops::{refresh_progress, require_active, require_user, RoadmapUpdate},
    Navigator,
};
use crate::{
    error::Result,
    generate::{GenerationContext, RebalanceContext},
    models::{
        missed_percentage_in_window, NewRoadmapVersion, ProgressSnapshot, RebalanceRequest,
        RoadmapVersion, UserProfile, MISSED_TASK_WINDOW_WEEKS,
    },
    params::{validate_weekly_hours, EvaluateRebalance, RebalanceRoadmap, UserId},
    rules::RebalanceRecommendation,
};

/// Freshly computed progress with the recent miss rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub snapshot: ProgressSnapshot,
    /// Skipped share of the tasks in the last two weeks up to the current one
    pub recent_missed_percentage: f64,
}

/// Outcome of [`Navigator::rebalance_if_needed`].
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceCheck {
    pub recommendation: RebalanceRecommendation,
    /// The new version, when the recommendation called for one
    pub update: Option<RoadmapUpdate>,
}

impl Navigator {
    /// Recomputes the user's progress over the active roadmap and caches it.
    pub async fn progress(&self, params: &UserId) -> Result<ProgressReport> {
        let user_id = params.user_id.clone();

        self.with_store(move |store| {
            let roadmap = require_active(store, &user_id)?;
            let tasks = store.get_tasks(roadmap.id, None)?;
            let snapshot = ProgressSnapshot::from_tasks(&roadmap, &tasks);
            store.save_progress(&snapshot)?;

            Ok(ProgressReport {
                recent_missed_percentage: missed_percentage_in_window(
                    &tasks,
                    roadmap.current_week,
                    MISSED_TASK_WINDOW_WEEKS,
                ),
                snapshot,
            })
        })
        .await
    }

    /// Evaluates the rebalance rules, reconstructing the earlier profile from
    /// the `previous_*` parameters when present.
    pub async fn evaluate(&self, params: &EvaluateRebalance) -> Result<RebalanceRecommendation> {
        let user = self
            .show_user(&UserId {
                user_id: params.user_id.clone(),
            })
            .await?;
        let previous = params.previous_profile(&user)?;
        self.evaluate_against(&params.user_id, previous.as_ref())
            .await
    }

    /// Evaluates the rebalance rules for the stored state of `user_id`.
    pub async fn evaluate_against(
        &self,
        user_id: &str,
        previous: Option<&UserProfile>,
    ) -> Result<RebalanceRecommendation> {
        let (user, roadmap, progress) = self.load_state(user_id).await?;
        Ok(self.engine.evaluate(&progress, &user, &roadmap, previous))
    }

    /// Validates the parameters and rebalances.
    pub async fn rebalance_roadmap(&self, params: &RebalanceRoadmap) -> Result<RoadmapUpdate> {
        let request = params.validate()?;
        self.rebalance(&params.user_id, request).await
    }

    /// Replaces the active roadmap with a regenerated version.
    ///
    /// Hour and deadline changes are written to the profile; the new version
    /// keeps the current week and records the rebalance reason.
    pub async fn rebalance(&self, user_id: &str, request: RebalanceRequest) -> Result<RoadmapUpdate> {
        self.rebalance_from(user_id, request, None).await
    }

    /// Evaluates the rules and rebalances when they say so, attributing the
    /// new version to the winning trigger.
    pub async fn rebalance_if_needed(
        &self,
        user_id: &str,
        previous: Option<&UserProfile>,
    ) -> Result<RebalanceCheck> {
        let recommendation = self.evaluate_against(user_id, previous).await?;

        let update = match recommendation.trigger {
            Some(trigger) if recommendation.should_rebalance => {
                let request = RebalanceRequest {
                    reason: Some(format!("{}: {}", trigger.label(), recommendation.message)),
                    ..RebalanceRequest::triggered_by(trigger)
                };
                Some(self.rebalance_from(user_id, request, previous).await?)
            }
            _ => None,
        };

        Ok(RebalanceCheck {
            recommendation,
            update,
        })
    }

    async fn load_state(
        &self,
        user_id: &str,
    ) -> Result<(UserProfile, RoadmapVersion, ProgressSnapshot)> {
        let user_id = user_id.to_string();
        self.with_store(move |store| {
            let user = require_user(store, &user_id)?;
            let roadmap = require_active(store, &user_id)?;
            let progress = refresh_progress(store, &roadmap)?;
            Ok((user, roadmap, progress))
        })
        .await
    }

    /// `baseline` is the profile before an edit that already reached the
    /// store; without it the stored profile is the baseline.
    async fn rebalance_from(
        &self,
        user_id: &str,
        request: RebalanceRequest,
        baseline: Option<&UserProfile>,
    ) -> Result<RoadmapUpdate> {
        let (user, roadmap, progress) = self.load_state(user_id).await?;

        let new_weekly_hours = match request.life_event {
            Some(event) => event.adjusted_hours(user.weekly_hours),
            None => request
                .new_weekly_hours
                .map(validate_weekly_hours)
                .transpose()?,
        };
        let new_deadline = request.new_deadline.filter(|deadline| *deadline != user.deadline);
        let request = RebalanceRequest {
            new_weekly_hours,
            new_deadline,
            ..request
        };

        let previous_weekly_hours = baseline.map_or(user.weekly_hours, |p| p.weekly_hours);
        let deadline_changed =
            new_deadline.is_some() || baseline.is_some_and(|p| p.deadline != user.deadline);
        let reason = request.compose_reason(user.weekly_hours);

        let mut updated = user.clone();
        if let Some(hours) = new_weekly_hours {
            updated.weekly_hours = hours;
        }
        if let Some(deadline) = new_deadline {
            updated.deadline = deadline;
        }

        let context = GenerationContext::rebalance(
            updated.clone(),
            RebalanceContext {
                roadmap: roadmap.clone(),
                progress,
                trigger: request.trigger,
                reason: reason.clone(),
                previous_weekly_hours,
                deadline_changed,
                timeline_change_weeks: request.timeline_change_weeks,
            },
        );
        let generated = self.generate(context, request.roadmap_text.clone()).await?;

        let new_version = NewRoadmapVersion {
            body: generated.body,
            current_week: roadmap.current_week,
            rebalance_reason: Some(reason),
            rebalanced_at: Some(Timestamp::now()),
        };
        let profile_changed = updated != user;
        let created = self
            .with_store(move |store| {
                if profile_changed {
                    store.upsert_user(&updated)?;
                }
                let created = store.create_version(&updated.id, &new_version)?;
                refresh_progress(store, &created)?;
                Ok(created)
            })
            .await?;

        info!(
            "Rebalanced roadmap {} -> {} for user '{}' ({}, {} generator, {} weeks)",
            roadmap.id,
            created.id,
            created.user_id,
            request.trigger.as_str(),
            generated.source.as_str(),
            created.total_weeks
        );

        let message = match request.life_event {
            Some(event) => Some(event.message().to_string()),
            None => generated
                .summary
                .as_ref()
                .map(|summary| summary.user_message.clone())
                .filter(|message| !message.is_empty()),
        };

        Ok(RoadmapUpdate {
            roadmap: created,
            replaced: Some(roadmap.id),
            source: generated.source,
            trigger: Some(request.trigger),
            summary: generated.summary,
            message,
        })
    }
}
