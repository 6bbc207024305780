use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input, caller's fault. No state change occurred.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid API key.
    #[error("{0}")]
    Unauthorized(String),

    /// Entity absent, or present but not owned by the caller. Ownership
    /// mismatches are reported as not-found so existence never leaks
    /// across brands.
    #[error("{0}")]
    NotFound(String),

    /// The lifecycle state machine rejects the operation from the
    /// license's current state (e.g. anything after revoked).
    #[error("{0}")]
    InvalidTransition(String),

    /// License exists but is not currently usable (suspended, revoked,
    /// or expired at activation time).
    #[error("{0}")]
    InvalidState(String),

    /// No free seat under the license's seat_limit.
    #[error("{0}")]
    SeatLimitExceeded(String),

    /// Lost a concurrent-write race or hit a uniqueness constraint;
    /// the caller may retry.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_) | AppError::SeatLimitExceeded(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Pool(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal failures are logged in full but never leak details.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// SQLite reports UNIQUE violations as constraint errors; callers that
/// race on a uniqueness invariant map them to Conflict.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
