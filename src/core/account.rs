//! Account business logic - registration, credential checks, and the balance
//! row.
//!
//! The balance row is the single piece of mutable ledger state. It is only
//! ever changed through [`apply_balance_delta`], an atomic database-level
//! increment, so two concurrent appends for the same user cannot lose an
//! update the way a read-modify-write cycle would.

use crate::{
    entities::{Balance, User, balance, user},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Registers a new user together with their initial balance row.
///
/// The user row and the balance row are created in one database transaction;
/// a user can never exist without a balance. The initial balance may be any
/// finite value, negative included (an account can start in debt).
///
/// # Errors
/// Returns an error if the username is empty, already taken, the initial
/// balance is not finite, or the insert fails.
pub async fn register_user(
    db: &DatabaseConnection,
    username: String,
    password: String,
    initial_balance: f64,
) -> Result<user::Model> {
    if username.trim().is_empty() {
        return Err(Error::Validation {
            message: "Username cannot be empty".to_string(),
        });
    }

    if !initial_balance.is_finite() {
        return Err(Error::InvalidAmount {
            amount: initial_balance,
        });
    }

    let username = username.trim().to_string();

    if get_user_by_username(db, &username).await?.is_some() {
        return Err(Error::UsernameTaken { username });
    }

    let txn = db.begin().await?;

    let new_user = user::ActiveModel {
        username: Set(username),
        password: Set(password),
        ..Default::default()
    };
    let created = new_user.insert(&txn).await?;

    let initial = balance::ActiveModel {
        user_id: Set(created.id),
        amount: Set(initial_balance),
        ..Default::default()
    };
    initial.insert(&txn).await?;

    txn.commit().await?;

    Ok(created)
}

/// Checks a username/password pair against the stored credentials.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] when the user does not exist or the
/// password does not match; both cases look identical to the caller.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let found = get_user_by_username(db, username).await?;

    match found {
        Some(user) if user.password == password => Ok(user),
        _ => Err(Error::InvalidCredentials),
    }
}

/// Finds a user by their unique id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by their login name.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the stored balance amount for a user, or `None` when no balance
/// row exists yet.
pub async fn get_balance(db: &DatabaseConnection, user_id: i64) -> Result<Option<f64>> {
    let row = Balance::find()
        .filter(balance::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    Ok(row.map(|b| b.amount))
}

/// Returns the stored balance amount, treating a missing row as zero.
pub async fn get_balance_or_default(db: &DatabaseConnection, user_id: i64) -> Result<f64> {
    Ok(get_balance(db, user_id).await?.unwrap_or(0.0))
}

/// Applies a signed delta to a user's balance with an atomic database-level
/// increment.
///
/// A missing balance row is created with amount zero before the increment,
/// so out-of-band seeded users still get a row on their first transaction.
/// The update itself is a single SQL statement:
/// `UPDATE balances SET amount = amount + ? WHERE user_id = ?` — never a
/// read-then-write of the amount value.
///
/// # Arguments
/// * `db` - Database connection or open transaction
/// * `user_id` - Owner of the balance row
/// * `delta` - Signed amount to add (negative subtracts)
///
/// # Returns
/// The updated balance row.
pub async fn apply_balance_delta<C>(db: &C, user_id: i64, delta: f64) -> Result<balance::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let existing = Balance::find()
        .filter(balance::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    if existing.is_none() {
        let zero = balance::ActiveModel {
            user_id: Set(user_id),
            amount: Set(0.0),
            ..Default::default()
        };
        zero.insert(db).await?;
    }

    Balance::update_many()
        .col_expr(
            balance::Column::Amount,
            Expr::col(balance::Column::Amount).add(delta),
        )
        .filter(balance::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Balance::find()
        .filter(balance::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            user: user_id.to_string(),
        })
}
