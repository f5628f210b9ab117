//! GraphQL mutations for Memberhub
//!
//! This module contains all mutation resolvers, organized by domain.
//!
//! Create mutations always surface store failures as errors. Change, delete
//! and (un)subscribe mutations go through [`apply_failure_policy`], which
//! either surfaces the failure or logs it and yields the mutation's sentinel
//! value, depending on the configured [`MutationFailurePolicy`].

mod post;
mod profile;
mod subscription;
mod user;

pub use post::PostMutation;
pub use profile::ProfileMutation;
pub use subscription::SubscriptionMutation;
pub use user::UserMutation;

use async_graphql::{Context, MergedObject, Result};

use crate::config::MutationFailurePolicy;
use crate::error::{ApiError, ApiResult};

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, PostMutation, ProfileMutation, SubscriptionMutation);

/// Resolve a store result according to the mutation failure policy
///
/// Returns `Ok(None)` for a failure swallowed by the soft policy.
pub(crate) fn apply_failure_policy<T>(
    ctx: &Context<'_>,
    operation: &'static str,
    result: ApiResult<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            let policy = ctx
                .data_opt::<MutationFailurePolicy>()
                .copied()
                .unwrap_or_default();

            match policy {
                MutationFailurePolicy::Strict => Err(error.to_graphql()),
                MutationFailurePolicy::Soft => {
                    tracing::warn!(
                        operation,
                        error = %error,
                        code = error.error_code(),
                        "Mutation failed, returning empty result"
                    );
                    Ok(None)
                }
            }
        }
    }
}

/// Reject a year of birth outside the accepted range
pub(crate) fn validate_year_of_birth(year: i32) -> Result<()> {
    use crate::models::profile::{is_valid_year_of_birth, MIN_YEAR_OF_BIRTH};

    if is_valid_year_of_birth(year) {
        return Ok(());
    }
    Err(ApiError::ValidationError(format!(
        "yearOfBirth must be between {} and the current year, got {}",
        MIN_YEAR_OF_BIRTH, year
    ))
    .to_graphql())
}
