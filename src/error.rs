use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure surface of the service. The registration conflicts get their own
/// variants so the lifecycle code reads as the state machine it enforces;
/// everything maps onto the 400/401/403/404/409/500 taxonomy below.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("Event is canceled")]
    EventCanceled,
    #[error("Already registered for this event")]
    AlreadyRegistered,
    #[error("Event is sold out")]
    SoldOut,
    #[error("Not registered for this event")]
    NotRegistered,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::EventCanceled
            | AppError::AlreadyRegistered
            | AppError::SoldOut
            | AppError::NotRegistered
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                // A unique-constraint hit is the caller's conflict, not ours.
                if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({ "error": "Resource already exists" })),
                    )
                        .into_response();
                }
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
