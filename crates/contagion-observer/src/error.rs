//! Error types for the Observer API server.
//!
//! [`ObserverError`] converts into an Axum response with a JSON
//! `{error, status}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contagion_core::session::SessionError;
use contagion_types::ParseTraitError;

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested region or trait does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was well-formed but cannot be applied.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The session is no longer accepting this operation.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<SessionError> for ObserverError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownRegion(name) => Self::NotFound(format!("region {name}")),
            SessionError::AlreadyStarted | SessionError::AlreadyStopped => {
                Self::Conflict(err.to_string())
            }
        }
    }
}

impl From<ParseTraitError> for ObserverError {
    fn from(err: ParseTraitError) -> Self {
        Self::NotFound(format!("trait {}", err.0))
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
