//! Route handlers.

pub mod health;
pub mod notifications;

use axum::http::StatusCode;
use herald_core::HeraldError;

/// Map a core error onto an HTTP error response.
pub fn error_response(error: HeraldError) -> (StatusCode, String) {
    let status = match &error {
        HeraldError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}
