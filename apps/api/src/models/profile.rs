//! Profile model for Memberhub
//!
//! Each user owns at most one profile, which pins the user to a membership
//! tier.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::member_type::MemberTypeId;

/// Earliest accepted year of birth
pub const MIN_YEAR_OF_BIRTH: i32 = 1900;

/// Profile record from the profiles table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Profile {
    /// Unique profile identifier
    pub id: Uuid,

    /// Gender flag
    pub is_male: bool,

    /// Year of birth
    pub year_of_birth: i32,

    /// Owning user (unique)
    pub user_id: Uuid,

    /// Membership tier
    #[sqlx(try_from = "String")]
    pub member_type_id: MemberTypeId,
}

/// Profile creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl Profile {
    /// Build a new profile row with a fresh identifier
    pub fn create(input: CreateProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            user_id: input.user_id,
            member_type_id: input.member_type_id,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: UpdateProfile) {
        if let Some(is_male) = update.is_male {
            self.is_male = is_male;
        }
        if let Some(year_of_birth) = update.year_of_birth {
            self.year_of_birth = year_of_birth;
        }
        if let Some(member_type_id) = update.member_type_id {
            self.member_type_id = member_type_id;
        }
    }
}

/// Check that a year of birth lies in `[MIN_YEAR_OF_BIRTH, current year]`
pub fn is_valid_year_of_birth(year: i32) -> bool {
    (MIN_YEAR_OF_BIRTH..=Utc::now().year()).contains(&year)
}
