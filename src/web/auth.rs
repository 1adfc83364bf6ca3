//! Registration and login endpoints.
//!
//! Login only verifies credentials and hands back the user id — the opaque
//! account identifier every other endpoint takes in its path.

use crate::{
    core::account,
    web::{ApiError, AppState},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Payload for `POST /api/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired login name
    pub username: String,
    /// Login password
    pub password: String,
    /// Opening balance for the new account
    pub initial_balance: f64,
}

/// Payload for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
}

/// Response for both auth endpoints.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The account identifier for subsequent requests
    pub user_id: i64,
}

/// `POST /api/register` - creates a user and their initial balance row.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user =
        account::register_user(&state.db, req.username, req.password, req.initial_balance).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user_id: user.id })))
}

/// `POST /api/login` - verifies credentials and returns the account id.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = account::verify_credentials(&state.db, &req.username, &req.password).await?;

    Ok(Json(AuthResponse { user_id: user.id }))
}
