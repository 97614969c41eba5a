//! HTTP handlers for the server.

pub mod designs;
pub mod render;

use axum::http::StatusCode;

use crate::error::InsigniaError;

/// Map a library error onto the `(status, message)` pair handlers return.
pub(crate) fn error_response(e: InsigniaError) -> (StatusCode, String) {
    let status = match &e {
        InsigniaError::InvalidPatch(_)
        | InsigniaError::Asset(_)
        | InsigniaError::Symbol(_)
        | InsigniaError::Json(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
