//! Transaction entity - Represents all ledger movements in the system.
//!
//! Each transaction has a `user_id`, a positive `amount` magnitude, a `kind`
//! label (see `core::transaction::TransactionKind` for the closed set and the
//! sign rule), a free-form `category`, and a creation `timestamp`. Rows are
//! append-only: no edit or delete operation exists anywhere in the system.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Monetary magnitude, always positive; the sign comes from `kind`
    pub amount: f64,
    /// Kind label, e.g. `"Income"`, `"Expense"`, `"Loan Received"`
    pub kind: String,
    /// Spending category label, e.g. `"Food"`, `"Rent"`
    pub category: String,
    /// When the transaction was recorded (server UTC unless supplied)
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
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
