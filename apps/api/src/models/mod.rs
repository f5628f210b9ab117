//! Database models and types for Memberhub
//!
//! This module contains SQLx models for:
//! - Users and their subscription edges
//! - Profiles and membership tiers
//! - Posts

pub mod member_type;
pub mod post;
pub mod profile;
pub mod subscription;
pub mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::Post;
pub use profile::Profile;
pub use subscription::{LinkedUser, SubscriptionEdge};
pub use user::User;
