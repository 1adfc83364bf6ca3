//! Transaction append and filtered listing endpoints.

use crate::{
    core::transaction::{self, TransactionFilter, TransactionKind},
    entities::transaction as transaction_entity,
    errors::Error,
    web::{ApiError, AppState},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};

/// Payload for `POST /api/users/:user_id/transactions`.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Positive magnitude; the sign comes from `kind`
    pub amount: f64,
    /// Ledger entry kind, e.g. `"Income"` or `"Loan Received"`
    pub kind: TransactionKind,
    /// Category label
    pub category: String,
    /// Optional recording time; server UTC time when omitted
    pub timestamp: Option<DateTimeUtc>,
}

/// Response for a successful append: the new row plus the balance it
/// produced.
#[derive(Debug, Serialize)]
pub struct CreateTransactionResponse {
    /// The appended transaction
    pub transaction: transaction_entity::Model,
    /// Account balance after the append
    pub balance: f64,
}

/// Query parameters for `GET /api/users/:user_id/transactions`.
///
/// All parameters are optional and combine with AND. Dates accept
/// `YYYY-MM-DD` (expanded to the start or end of that day) or a full
/// `YYYY-MM-DDTHH:MM:SS`. A `kind` of `"All"` matches everything, the same
/// as omitting it — that is what the filter form in the original UI sends.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// Earliest date to include
    pub start_date: Option<String>,
    /// Latest date to include
    pub end_date: Option<String>,
    /// Smallest amount magnitude to include
    pub min_amount: Option<f64>,
    /// Largest amount magnitude to include
    pub max_amount: Option<f64>,
    /// Kind label, or `"All"` for no kind filter
    pub kind: Option<String>,
    /// Category label
    pub category: Option<String>,
}

impl TransactionQuery {
    /// Parses the raw query strings into a typed [`TransactionFilter`].
    ///
    /// # Errors
    /// Returns a validation error for unparseable dates or an unknown kind
    /// label.
    pub fn into_filter(self) -> crate::errors::Result<TransactionFilter> {
        let start = self
            .start_date
            .as_deref()
            .map(|s| parse_date_bound(s, false))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|s| parse_date_bound(s, true))
            .transpose()?;

        let kind = match self.kind.as_deref() {
            None | Some("") | Some("All") => None,
            Some(label) => Some(label.parse::<TransactionKind>()?),
        };

        Ok(TransactionFilter {
            start,
            end,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            kind,
            category: self.category.filter(|c| !c.is_empty()),
        })
    }
}

/// Parses a timestamp bound, expanding a bare date to the start or end of
/// that day so both bounds stay inclusive.
fn parse_date_bound(input: &str, end_of_day: bool) -> crate::errors::Result<DateTimeUtc> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        #[allow(clippy::expect_used)] // 23:59:59 is always a valid time
        let time = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59).expect("valid constant time")
        } else {
            NaiveTime::MIN
        };
        return Ok(date.and_time(time).and_utc());
    }

    Err(Error::Validation {
        message: format!("Unrecognized date: {input}"),
    })
}

/// `POST /api/users/:user_id/transactions` - appends a transaction and moves
/// the balance atomically.
pub async fn create(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), ApiError> {
    let (created, balance) = transaction::create_transaction(
        &state.db,
        user_id,
        req.amount,
        req.kind,
        req.category,
        req.timestamp,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            transaction: created,
            balance,
        }),
    ))
}

/// `GET /api/users/:user_id/transactions` - filtered listing, newest first.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<transaction_entity::Model>>, ApiError> {
    let filter = query.into_filter()?;
    let listed = transaction::list_transactions(&state.db, user_id, &filter).await?;

    Ok(Json(listed))
}
