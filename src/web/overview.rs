//! The dashboard endpoint: current balance plus every derived view of the
//! transaction history.
//!
//! The balance figure comes from the stored balance row while the series is
//! recomputed from zero; when rows were seeded out-of-band the two can
//! disagree, and the response reports both as they are.

use crate::{
    core::{account, aggregate},
    errors::Error,
    web::{ApiError, AppState},
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// One chart point: formatted date and the running balance after the
/// transaction at that date.
#[derive(Debug, Serialize)]
pub struct SeriesPoint {
    /// Transaction time, formatted `YYYY-MM-DD HH:MM`
    pub date: String,
    /// Running balance after the transaction
    pub balance: f64,
}

/// Response for `GET /api/users/:user_id/overview`.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    /// Current stored account balance
    pub balance: f64,
    /// `"YYYY-MM"` to income/expense sums
    pub monthly_totals: BTreeMap<String, aggregate::MonthlyTotals>,
    /// Category label to summed expense amount
    pub category_totals: BTreeMap<String, f64>,
    /// Running balance per transaction, oldest first
    pub balance_series: Vec<SeriesPoint>,
}

/// `GET /api/users/:user_id/overview` - the data behind the home page
/// charts.
pub async fn overview(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<OverviewResponse>, ApiError> {
    account::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            user: user_id.to_string(),
        })?;

    let balance = account::get_balance_or_default(&state.db, user_id).await?;
    let summary = aggregate::aggregate_for_user(&state.db, user_id).await?;

    let balance_series = summary
        .balance_series
        .iter()
        .map(|point| SeriesPoint {
            date: point.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            balance: point.balance,
        })
        .collect();

    Ok(Json(OverviewResponse {
        balance,
        monthly_totals: summary.monthly_totals,
        category_totals: summary.category_totals,
        balance_series,
    }))
}
