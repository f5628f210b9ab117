//! GraphQL type definitions for Memberhub
//!
//! Output objects wrap the store models; relationship fields on [`User`] and
//! [`Profile`] resolve through the request's loader registry.

mod member_type;
mod post;
mod profile;
mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::{ChangePostInput, CreatePostInput, Post};
pub use profile::{ChangeProfileInput, CreateProfileInput, Profile};
pub use user::{ChangeUserInput, CreateUserInput, User};
