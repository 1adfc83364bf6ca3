//! Budget business logic - per-category limits and the spend-vs-limit
//! evaluator.
//!
//! The store side upserts one row per (user, category) pair and deletes by
//! id, always scoped to the owning user. The evaluator side is a pure
//! function from budgets and category totals to display rows; it never
//! touches the database.

use crate::{
    core::aggregate,
    entities::{Budget, budget},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Spend-vs-limit classification for one budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    /// Under 80% of the limit spent
    Ok,
    /// Between 80% and 100% of the limit spent, inclusive
    Warning,
    /// Over the limit
    Danger,
}

impl fmt::Display for BudgetHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        f.write_str(label)
    }
}

/// One evaluated budget row, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetReport {
    /// Budget row id (used for deletion)
    pub id: i64,
    /// Category the limit applies to
    pub category: String,
    /// The configured limit amount
    pub limit: f64,
    /// Total spent in the category across the full history
    pub spent: f64,
    /// Spend as a percentage of the limit, rounded to one decimal place
    pub percent: f64,
    /// Classification of the unrounded percentage
    pub status: BudgetHealth,
}

/// Classifies an unrounded spend percentage. First match wins: under 80 is
/// ok, up to and including 100 is warning, anything above is danger.
#[must_use]
pub fn classify_spend(percent: f64) -> BudgetHealth {
    if percent < 80.0 {
        BudgetHealth::Ok
    } else if percent <= 100.0 {
        BudgetHealth::Warning
    } else {
        BudgetHealth::Danger
    }
}

/// Evaluates budgets against aggregated category spend.
///
/// Pure function: no I/O, no side effects. A category with no recorded
/// spend counts as zero, and a zero limit yields percent zero rather than a
/// division error. Classification happens on the unrounded percentage;
/// the reported `percent` is rounded to one decimal afterwards, so a
/// borderline value can display as `80.0` while still classifying as ok.
#[must_use]
pub fn evaluate_budgets(
    budgets: &[budget::Model],
    category_totals: &BTreeMap<String, f64>,
) -> Vec<BudgetReport> {
    budgets
        .iter()
        .map(|b| {
            let spent = category_totals.get(&b.category).copied().unwrap_or(0.0);
            let percent = if b.amount == 0.0 {
                0.0
            } else {
                (spent / b.amount) * 100.0
            };
            let status = classify_spend(percent);

            BudgetReport {
                id: b.id,
                category: b.category.clone(),
                limit: b.amount,
                spent,
                percent: (percent * 10.0).round() / 10.0,
                status,
            }
        })
        .collect()
}

/// Lists a user's budgets, ordered by category for stable output.
pub async fn list_budgets(db: &DatabaseConnection, user_id: i64) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_asc(budget::Column::Category)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates or updates the budget for a (user, category) pair.
///
/// The pair is the upsert key: an existing row gets its limit replaced, a
/// missing row is inserted. "Not found" is never an error here.
///
/// # Errors
/// Returns an error if the category is empty, the limit is negative or not
/// finite, or a store operation fails.
pub async fn upsert_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category: String,
    amount: f64,
) -> Result<budget::Model> {
    if category.trim().is_empty() {
        return Err(Error::Validation {
            message: "Budget category cannot be empty".to_string(),
        });
    }

    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let category = category.trim().to_string();

    let existing = Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::Category.eq(category.as_str()))
        .one(db)
        .await?;

    if let Some(found) = existing {
        let mut active: budget::ActiveModel = found.into();
        active.amount = Set(amount);
        active.update(db).await.map_err(Into::into)
    } else {
        let new_budget = budget::ActiveModel {
            user_id: Set(user_id),
            category: Set(category),
            amount: Set(amount),
            ..Default::default()
        };
        new_budget.insert(db).await.map_err(Into::into)
    }
}

/// Deletes a budget by id, scoped to the owning user.
///
/// A missing id, or an id owned by another user, is a silent no-op — the
/// filter on `user_id` means the cross-account case simply affects zero
/// rows.
pub async fn delete_budget(db: &DatabaseConnection, user_id: i64, budget_id: i64) -> Result<()> {
    Budget::delete_many()
        .filter(budget::Column::Id.eq(budget_id))
        .filter(budget::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(())
}

/// Loads a user's budgets and category spend, and evaluates them together.
/// This is the data behind the budget page.
pub async fn budget_overview(db: &DatabaseConnection, user_id: i64) -> Result<Vec<BudgetReport>> {
    let budgets = list_budgets(db, user_id).await?;
    let summary = aggregate::aggregate_for_user(db, user_id).await?;

    Ok(evaluate_budgets(&budgets, &summary.category_totals))
}
