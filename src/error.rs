use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Event not found: {0}")]
    EventNotFound(String),
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Booking window not yet open")]
    BookingWindowNotYetOpen,
    #[error("Booking window closed")]
    BookingWindowClosed,
    #[error("Per-user limit exceeded: {0}")]
    PerUserLimitExceeded(String),
    #[error("Ticket already redeemed: {0}")]
    AlreadyRedeemed(String),
    #[error("Missing caller identity")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "PERSISTENCE_FAILURE",
            AppError::EventNotFound(_) => "EVENT_NOT_FOUND",
            AppError::TicketNotFound(_) => "TICKET_NOT_FOUND",
            AppError::InvalidQuantity(_) => "INVALID_QUANTITY",
            AppError::BookingWindowNotYetOpen => "BOOKING_WINDOW_NOT_YET_OPEN",
            AppError::BookingWindowClosed => "BOOKING_WINDOW_CLOSED",
            AppError::PerUserLimitExceeded(_) => "PER_USER_LIMIT_EXCEEDED",
            AppError::AlreadyRedeemed(_) => "TICKET_ALREADY_REDEEMED",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "INVALID_INPUT",
            AppError::Internal => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let db_code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if db_code == "2067" || db_code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)", "code": "CONFLICT" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::EventNotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::TicketNotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidQuantity(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BookingWindowNotYetOpen => (
                StatusCode::CONFLICT,
                "Ticket sales have not opened yet for this event".to_string(),
            ),
            AppError::BookingWindowClosed => (
                StatusCode::CONFLICT,
                "Ticket sales for this event are closed".to_string(),
            ),
            AppError::PerUserLimitExceeded(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::AlreadyRedeemed(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing or empty X-User-Id header".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
