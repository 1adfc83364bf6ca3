//! Web layer - HTTP JSON API over the core ledger operations.
//!
//! Handlers are thin: they parse the request, call into `crate::core`, and
//! map errors onto status codes. The user id in the path is the opaque
//! account identifier the core consumes — session handling for a browser
//! frontend belongs to an upstream proxy or a future UI layer, not here.

/// Registration and login endpoints
pub mod auth;
/// Budget listing, upsert, and deletion endpoints
pub mod budgets;
/// The dashboard endpoint: balance plus aggregated history
pub mod overview;
/// Transaction append and filtered listing endpoints
pub mod transactions;

use crate::{config::categories, errors::Error};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all store operations
    pub db: DatabaseConnection,
}

/// Error wrapper that turns core errors into HTTP responses.
///
/// Handlers return `Result<_, ApiError>` and use `?` on core calls; the
/// `From` impl picks up the conversion.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// The status code this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            Error::Validation { .. } | Error::InvalidAmount { .. } | Error::InvalidKind { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
            Error::UsernameTaken { .. } => StatusCode::CONFLICT,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Returns the configured category catalog for UI dropdowns.
async fn list_categories() -> Json<Vec<String>> {
    Json(categories::load_default_catalog().categories)
}

/// Builds the application router with all API routes.
#[must_use]
pub fn router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/categories", get(list_categories))
        .route("/api/users/:user_id/overview", get(overview::overview))
        .route(
            "/api/users/:user_id/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/api/users/:user_id/budgets",
            get(budgets::list).put(budgets::upsert),
        )
        .route(
            "/api/users/:user_id/budgets/:budget_id",
            delete(budgets::remove),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { db })
}

/// Binds the listener and serves the API until the process is stopped.
///
/// # Errors
/// Returns an error when the address cannot be bound or the server fails.
pub async fn serve(db: DatabaseConnection, addr: &str) -> crate::errors::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, router(db)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let bad_request = ApiError(Error::InvalidAmount { amount: -1.0 });
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let unauthorized = ApiError(Error::InvalidCredentials);
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let not_found = ApiError(Error::UserNotFound {
            user: "7".to_string(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = ApiError(Error::UsernameTaken {
            username: "alice".to_string(),
        });
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let config = ApiError(Error::Config {
            message: "bad".to_string(),
        });
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_categories_endpoint_returns_catalog() {
        let Json(listed) = list_categories().await;
        assert!(!listed.is_empty());
    }
}
