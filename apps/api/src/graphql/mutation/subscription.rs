//! Subscription mutations
//!
//! - subscribeTo: `userId` starts following `authorId`, returns the subscriber
//! - unsubscribeFrom: removes the edge

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::graphql::types::User;
use crate::models::SubscriptionEdge;
use crate::repositories::SharedStore;

use super::apply_failure_policy;

#[derive(Default)]
pub struct SubscriptionMutation;

#[Object]
impl SubscriptionMutation {
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<User>> {
        let store = ctx.data::<SharedStore>()?;

        let result: ApiResult<_> = async {
            store
                .subscribe(SubscriptionEdge::new(user_id, author_id))
                .await?;
            store
                .find_user(user_id)
                .await?
                .ok_or_else(|| ApiError::not_found("user", user_id))
        }
        .await;

        Ok(apply_failure_policy(ctx, "subscribeTo", result)?.map(User::from))
    }

    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let store = ctx.data::<SharedStore>()?;
        let result = store
            .unsubscribe(SubscriptionEdge::new(user_id, author_id))
            .await;
        Ok(apply_failure_policy(ctx, "unsubscribeFrom", result)?.is_some())
    }
}
