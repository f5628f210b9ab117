//! User model for Memberhub

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record from the users table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Account balance
    pub balance: f64,
}

/// User creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub balance: f64,
}

/// Partial user update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl User {
    /// Build a new user row with a fresh identifier
    pub fn create(input: CreateUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            balance: input.balance,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(balance) = update.balance {
            self.balance = balance;
        }
    }
}
