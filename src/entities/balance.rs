//! Balance entity - The current account balance, one row per user.
//!
//! The `amount` column is mutated exclusively through the atomic increment in
//! `core::account`; it must always equal the initial balance plus the signed
//! sum of the user's transaction history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Balance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    /// Unique identifier for the balance row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Current balance in dollars (signed)
    pub amount: f64,
}

/// Defines relationships between Balance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each balance row belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
