//! Member type model for Memberhub
//!
//! Member types are static reference data: a closed set of membership tiers
//! seeded when the store is created.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Identifier of a membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberTypeId {
    Basic,
    Business,
}

/// Raised when a stored member type id is outside the known set
#[derive(Debug, Error)]
#[error("unknown member type id: {0}")]
pub struct UnknownMemberTypeId(pub String);

impl MemberTypeId {
    /// Every tier, in seeding order
    pub const ALL: [MemberTypeId; 2] = [MemberTypeId::Basic, MemberTypeId::Business];

    /// Storage spelling of the identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Business => "business",
        }
    }
}

impl std::fmt::Display for MemberTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MemberTypeId {
    type Error = UnknownMemberTypeId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "basic" => Ok(Self::Basic),
            "business" => Ok(Self::Business),
            _ => Err(UnknownMemberTypeId(value)),
        }
    }
}

/// Member type record from the member_types table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct MemberType {
    /// Tier identifier
    #[sqlx(try_from = "String")]
    pub id: MemberTypeId,

    /// Discount rate applied to the member
    pub discount: f64,

    /// Number of posts allowed per month
    pub posts_limit_per_month: i32,
}

impl MemberType {
    /// Reference rows seeded into every store
    pub fn seed() -> Vec<MemberType> {
        vec![
            MemberType {
                id: MemberTypeId::Basic,
                discount: 0.1,
                posts_limit_per_month: 20,
            },
            MemberType {
                id: MemberTypeId::Business,
                discount: 0.2,
                posts_limit_per_month: 100,
            },
        ]
    }
}
