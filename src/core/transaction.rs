//! Transaction business logic - kinds, the ledger sign rule, append and query
//! operations.
//!
//! A transaction is an immutable ledger entry: once appended it is never
//! edited or deleted. Appending a transaction and moving the account balance
//! happen inside one database transaction, so the two can never diverge on a
//! partial failure. The sign rule lives on [`TransactionKind`] and is the
//! single source of truth for the whole system — the aggregator replays
//! history through the same rule.

use crate::{
    core::account,
    entities::{Transaction, User, transaction},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of ledger entry kinds.
///
/// `Income` and `Loan Received` move money into the account; every other
/// kind moves money out. The string forms match what the original data
/// carries (`"Loan Received"` with a space), so parsing and display round-trip
/// against stored rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned (salary, refunds, ...)
    Income,
    /// Money spent; the only kind that feeds category spend totals
    Expense,
    /// Borrowed money arriving in the account
    #[serde(rename = "Loan Received")]
    LoanReceived,
    /// Repayment of borrowed money leaving the account
    #[serde(rename = "Loan Payment")]
    LoanPayment,
}

impl TransactionKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 4] = [
        Self::Income,
        Self::Expense,
        Self::LoanReceived,
        Self::LoanPayment,
    ];

    /// The canonical label stored in the database and shown to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::LoanReceived => "Loan Received",
            Self::LoanPayment => "Loan Payment",
        }
    }

    /// The ledger sign rule: converts a positive magnitude into the signed
    /// delta this kind applies to a balance.
    ///
    /// Income-like kinds (`Income`, `Loan Received`) add the amount; every
    /// other kind subtracts it. Both the balance engine and the aggregator
    /// go through this method.
    #[must_use]
    pub fn signed_delta(self, amount: f64) -> f64 {
        match self {
            Self::Income | Self::LoanReceived => amount,
            Self::Expense | Self::LoanPayment => -amount,
        }
    }

    /// Sign rule for a raw kind label as stored in the database.
    ///
    /// Rows seeded out-of-band can carry labels outside the known set; those
    /// fall on the subtracting side of the rule, matching the catch-all in
    /// [`signed_delta`](Self::signed_delta).
    #[must_use]
    pub fn signed_delta_for(kind: &str, amount: f64) -> f64 {
        match kind.parse::<Self>() {
            Ok(known) => known.signed_delta(amount),
            Err(_) => -amount,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            "Loan Received" => Ok(Self::LoanReceived),
            "Loan Payment" => Ok(Self::LoanPayment),
            other => Err(Error::InvalidKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional, AND-combined criteria for transaction listings.
///
/// All bounds are inclusive. An empty filter matches every transaction the
/// user owns.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Earliest timestamp to include
    pub start: Option<DateTimeUtc>,
    /// Latest timestamp to include
    pub end: Option<DateTimeUtc>,
    /// Smallest amount magnitude to include
    pub min_amount: Option<f64>,
    /// Largest amount magnitude to include
    pub max_amount: Option<f64>,
    /// Only this kind
    pub kind: Option<TransactionKind>,
    /// Only this category label
    pub category: Option<String>,
}

/// Appends a transaction and moves the account balance in one atomic unit.
///
/// Validates the input, inserts the transaction row, and applies the signed
/// delta to the balance via the atomic increment in `core::account` — all
/// inside a single database transaction, so the append and the balance
/// update succeed or fail together. A missing balance row is created with
/// amount zero first.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owning account
/// * `amount` - Positive magnitude; the sign comes from `kind`
/// * `kind` - Ledger entry kind
/// * `category` - Category label (must be non-empty)
/// * `timestamp` - Recording time; server UTC time when `None`
///
/// # Returns
/// The created transaction row and the balance amount after the update.
///
/// # Errors
/// Returns an error if the amount is not finite or not strictly positive,
/// the category is empty, the user does not exist, or a store operation
/// fails.
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
    kind: TransactionKind,
    category: String,
    timestamp: Option<DateTimeUtc>,
) -> Result<(transaction::Model, f64)> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    if category.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category cannot be empty".to_string(),
        });
    }

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            user: user_id.to_string(),
        })?;

    let recorded_at = timestamp.unwrap_or_else(Utc::now);

    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        amount: Set(amount),
        kind: Set(kind.as_str().to_string()),
        category: Set(category.trim().to_string()),
        timestamp: Set(recorded_at),
        ..Default::default()
    };
    let created = model.insert(&txn).await?;

    let balance = account::apply_balance_delta(&txn, user_id, kind.signed_delta(amount)).await?;

    txn.commit().await?;

    Ok((created, balance.amount))
}

/// Lists a user's transactions, newest first, applying the given filter.
///
/// The id tiebreak keeps the order stable for transactions sharing a
/// timestamp.
pub async fn list_transactions(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find().filter(transaction::Column::UserId.eq(user_id));

    if let Some(start) = filter.start {
        query = query.filter(transaction::Column::Timestamp.gte(start));
    }
    if let Some(end) = filter.end {
        query = query.filter(transaction::Column::Timestamp.lte(end));
    }
    if let Some(min_amount) = filter.min_amount {
        query = query.filter(transaction::Column::Amount.gte(min_amount));
    }
    if let Some(max_amount) = filter.max_amount {
        query = query.filter(transaction::Column::Amount.lte(max_amount));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(transaction::Column::Kind.eq(kind.as_str()));
    }
    if let Some(ref category) = filter.category {
        query = query.filter(transaction::Column::Category.eq(category.as_str()));
    }

    query
        .order_by_desc(transaction::Column::Timestamp)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's full transaction history in replay order: timestamp
/// ascending, id ascending as the tiebreak.
///
/// This is the ordering the aggregator depends on — the id tiebreak makes
/// the running-balance series reproducible when timestamps collide.
pub async fn list_transactions_chronological(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_asc(transaction::Column::Timestamp)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
