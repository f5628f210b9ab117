//! Profile GraphQL types
//!
//! `Profile.memberType` resolves through the member type loader, so every
//! profile in a response shares one grouped fetch.

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::RequestLoaders;
use crate::models::profile::{CreateProfile, Profile as DbProfile, UpdateProfile};

use super::member_type::{MemberType, MemberTypeId};

/// Profile exposed via GraphQL
pub struct Profile {
    inner: DbProfile,
}

impl Profile {
    /// Create a new GraphQL Profile from a database Profile
    pub fn new(profile: DbProfile) -> Self {
        Self { inner: profile }
    }
}

impl From<DbProfile> for Profile {
    fn from(profile: DbProfile) -> Self {
        Self::new(profile)
    }
}

#[Object]
impl Profile {
    /// Unique profile identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn is_male(&self) -> bool {
        self.inner.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.inner.year_of_birth
    }

    /// Owning user
    async fn user_id(&self) -> Uuid {
        self.inner.user_id
    }

    async fn member_type_id(&self) -> MemberTypeId {
        self.inner.member_type_id.into()
    }

    /// Membership tier of this profile
    async fn member_type(&self, ctx: &Context<'_>) -> Result<Option<MemberType>> {
        let loaders = RequestLoaders::from_context(ctx)?;
        let member_type = loaders
            .member_types()
            .load_one(self.inner.member_type_id)
            .await
            .map_err(|e| e.as_graphql_error())?
            .flatten();
        Ok(member_type.map(MemberType::from))
    }
}

/// Input for `createProfile`
#[derive(Debug, InputObject)]
pub struct CreateProfileInput {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
}

impl From<CreateProfileInput> for CreateProfile {
    fn from(input: CreateProfileInput) -> Self {
        Self {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            user_id: input.user_id,
            member_type_id: input.member_type_id.into(),
        }
    }
}

/// Input for `changeProfile`; omitted fields keep their value
#[derive(Debug, InputObject)]
pub struct ChangeProfileInput {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl From<ChangeProfileInput> for UpdateProfile {
    fn from(input: ChangeProfileInput) -> Self {
        Self {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id.map(Into::into),
        }
    }
}
