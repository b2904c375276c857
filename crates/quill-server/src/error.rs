//! Server error type and response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quill_store::StoreError;
use serde_json::json;

/// Error for request handlers, rendered as a JSON `{ "error": ... }` body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// The addressed resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Store-level failure; not-found and validation variants keep their
    /// meaning, anything else is an internal error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServerError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::Store(StoreError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, format!("{what} not found"))
            }
            Self::Store(StoreError::Validation(message)) => (StatusCode::BAD_REQUEST, message),
            Self::Store(err) => {
                tracing::error!(error = %err, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_owned(),
                )
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
