//! Profile operations for the Navigator.

use super::Navigator;
use crate::{
    error::{PathwiseError, Result},
    models::UserProfile,
    params::{SaveUser, UpdateUser, UserId},
};

/// A profile edit, with the profile as it was before.
///
/// Pass `previous` to [`Navigator::evaluate_against`] to check whether the
/// edit calls for a rebalance.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub previous: UserProfile,
    pub current: UserProfile,
}

impl Navigator {
    /// Creates a profile, or replaces the editable fields of an existing one.
    /// Onboarding state and the active roadmap survive a replacement.
    pub async fn create_user(&self, params: &SaveUser) -> Result<UserProfile> {
        let mut profile = params.validate()?;

        self.with_store(move |store| {
            if let Some(existing) = store.get_user(&profile.id)? {
                profile.onboarding_completed = existing.onboarding_completed;
            }
            store.upsert_user(&profile)
        })
        .await
    }

    /// Retrieves a profile by its ID.
    pub async fn get_user(&self, params: &UserId) -> Result<Option<UserProfile>> {
        let user_id = params.user_id.clone();
        self.with_store(move |store| store.get_user(&user_id)).await
    }

    /// Retrieves a profile, failing with `UserNotFound` when it is missing.
    pub async fn show_user(&self, params: &UserId) -> Result<UserProfile> {
        self.get_user(params)
            .await?
            .ok_or_else(|| PathwiseError::UserNotFound {
                id: params.user_id.clone(),
            })
    }

    /// Applies a partial edit and returns the profile before and after.
    pub async fn update_user(&self, params: &UpdateUser) -> Result<ProfileUpdate> {
        let params = params.clone();

        self.with_store(move |store| {
            let previous = store
                .get_user(&params.user_id)?
                .ok_or_else(|| PathwiseError::UserNotFound {
                    id: params.user_id.clone(),
                })?;
            let updated = params.apply(&previous)?;
            let current = store.upsert_user(&updated)?;
            Ok(ProfileUpdate { previous, current })
        })
        .await
    }
}
