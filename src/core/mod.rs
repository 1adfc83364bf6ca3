//! Core business logic - framework-agnostic ledger, aggregation, and budget
//! operations.
//!
//! Everything in this module takes an explicit database handle and an explicit
//! user id; there is no ambient session state. The web layer is a thin shell
//! over these functions.

/// User registration, credentials, and the account balance row
pub mod account;
/// Time-series aggregation of transaction history (pure recomputation)
pub mod aggregate;
/// Budget store operations and the spend-vs-limit evaluator
pub mod budget;
/// Transaction kinds, the ledger sign rule, append and query operations
pub mod transaction;
