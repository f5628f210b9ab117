//! Profile mutations
//!
//! Year of birth is validated before the store is touched; a value outside
//! `[1900, current year]` is always reported as an error, whatever the
//! mutation failure policy.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::to_graphql_error;
use crate::graphql::types::{ChangeProfileInput, CreateProfileInput, Profile};
use crate::repositories::SharedStore;

use super::{apply_failure_policy, validate_year_of_birth};

#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    /// Create the profile of a user
    ///
    /// # Errors
    /// - `VALIDATION_ERROR` if the year of birth is out of range
    /// - `NOT_FOUND` if the user does not exist
    /// - `CONFLICT` if the user already has a profile
    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileInput) -> Result<Profile> {
        validate_year_of_birth(dto.year_of_birth)?;

        let store = ctx.data::<SharedStore>()?;
        let profile = store
            .create_profile(dto.into())
            .await
            .map_err(to_graphql_error)?;

        tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
        Ok(Profile::from(profile))
    }

    /// Update the given fields of a profile
    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileInput,
    ) -> Result<Option<Profile>> {
        if let Some(year) = dto.year_of_birth {
            validate_year_of_birth(year)?;
        }

        let store = ctx.data::<SharedStore>()?;
        let result = store.update_profile(id, dto.into()).await;
        Ok(apply_failure_policy(ctx, "changeProfile", result)?.map(Profile::from))
    }

    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let store = ctx.data::<SharedStore>()?;
        let result = store.delete_profile(id).await;
        Ok(apply_failure_policy(ctx, "deleteProfile", result)?.is_some())
    }
}
