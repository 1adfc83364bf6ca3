//! Shared test utilities for `WalletWatch`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{account, transaction::TransactionKind, transaction::create_transaction},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use sea_orm::prelude::DateTimeUtc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `username` - Login name
///
/// # Defaults
/// * `password`: `"password"`
/// * `initial_balance`: 0.0
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    account::register_user(db, username.to_string(), "password".to_string(), 0.0).await
}

/// Creates a test user with custom credentials and opening balance.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    initial_balance: f64,
) -> Result<entities::user::Model> {
    account::register_user(db, username.to_string(), password.to_string(), initial_balance).await
}

/// Appends a test transaction stamped with the current server time.
///
/// Returns the created row and the balance it produced, same as the engine.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    kind: TransactionKind,
    amount: f64,
    category: &str,
) -> Result<(entities::transaction::Model, f64)> {
    create_transaction(db, user_id, amount, kind, category.to_string(), None).await
}

/// Appends a test transaction with an explicit timestamp, for tests that
/// depend on replay order or month bucketing.
pub async fn create_transaction_at(
    db: &DatabaseConnection,
    user_id: i64,
    kind: TransactionKind,
    amount: f64,
    category: &str,
    timestamp: DateTimeUtc,
) -> Result<(entities::transaction::Model, f64)> {
    create_transaction(db, user_id, amount, kind, category.to_string(), Some(timestamp)).await
}

/// Sets up a complete test environment with a registered user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "alice").await?;
    Ok((db, user))
}
