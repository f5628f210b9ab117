//! Member type GraphQL types

use async_graphql::{Enum, SimpleObject};

use crate::models::member_type::{MemberType as DbMemberType, MemberTypeId as DbMemberTypeId};

/// Membership tier identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum MemberTypeId {
    #[graphql(name = "basic")]
    Basic,
    #[graphql(name = "business")]
    Business,
}

impl From<DbMemberTypeId> for MemberTypeId {
    fn from(id: DbMemberTypeId) -> Self {
        match id {
            DbMemberTypeId::Basic => Self::Basic,
            DbMemberTypeId::Business => Self::Business,
        }
    }
}

impl From<MemberTypeId> for DbMemberTypeId {
    fn from(id: MemberTypeId) -> Self {
        match id {
            MemberTypeId::Basic => Self::Basic,
            MemberTypeId::Business => Self::Business,
        }
    }
}

/// Membership tier exposed via GraphQL
#[derive(Debug, Clone, SimpleObject)]
pub struct MemberType {
    /// Tier identifier
    pub id: MemberTypeId,
    /// Discount rate
    pub discount: f64,
    /// Posts allowed per month
    pub posts_limit_per_month: i32,
}

impl From<DbMemberType> for MemberType {
    fn from(member_type: DbMemberType) -> Self {
        Self {
            id: member_type.id.into(),
            discount: member_type.discount,
            posts_limit_per_month: member_type.posts_limit_per_month,
        }
    }
}
