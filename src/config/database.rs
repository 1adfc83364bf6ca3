//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Schema comes from `Schema::create_table_from_entity`, so the
//! tables always match the entity definitions in `crate::entities` without
//! hand-written SQL. Table creation is idempotent (`IF NOT EXISTS`), which
//! lets the binary run the same startup path on a fresh or existing file.

use crate::entities::{Balance, Budget, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default database location when `DATABASE_URL` is not set.
/// `mode=rwc` lets `SQLite` create the file on first run.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/walletwatch.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// # Errors
/// Returns an error when the connection cannot be opened.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all application tables from the entity definitions.
///
/// Uses `IF NOT EXISTS` statements so repeated startups are harmless.
///
/// # Errors
/// Returns an error when a DDL statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut balance_table = schema.create_table_from_entity(Balance);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut budget_table = schema.create_table_from_entity(Budget);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(balance_table.if_not_exists()))
        .await?;
    db.execute(builder.build(transaction_table.if_not_exists()))
        .await?;
    db.execute(builder.build(budget_table.if_not_exists()))
        .await?;

    Ok(())
}
