//! GraphQL queries for Memberhub
//!
//! This module contains all query resolvers, organized by domain. By-id
//! lookups return `null` when the row does not exist.

mod member_type;
mod post;
mod profile;
mod user;

pub use member_type::MemberTypeQuery;
pub use post::PostQuery;
pub use profile::ProfileQuery;
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(MemberTypeQuery, PostQuery, UserQuery, ProfileQuery);
