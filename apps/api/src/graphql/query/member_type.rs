//! Member type queries

use async_graphql::{Context, Object, Result};

use crate::error::to_graphql_error;
use crate::graphql::types::{MemberType, MemberTypeId};
use crate::repositories::SharedStore;

/// Membership tier queries
#[derive(Default)]
pub struct MemberTypeQuery;

#[Object]
impl MemberTypeQuery {
    /// List every membership tier
    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberType>> {
        let store = ctx.data::<SharedStore>()?;
        let member_types = store.list_member_types().await.map_err(to_graphql_error)?;
        Ok(member_types.into_iter().map(MemberType::from).collect())
    }

    /// Get a membership tier by id
    async fn member_type(&self, ctx: &Context<'_>, id: MemberTypeId) -> Result<Option<MemberType>> {
        let store = ctx.data::<SharedStore>()?;
        let member_type = store
            .find_member_type(id.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(member_type.map(MemberType::from))
    }
}
