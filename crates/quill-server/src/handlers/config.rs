//! Blog configuration endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/config.
#[derive(Serialize)]
struct ConfigResponse {
    /// Blog title.
    title: String,
    /// Blog description, omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Application version.
    version: String,
}

/// Handle GET /api/config.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ConfigResponse {
        title: state.blog_title.clone(),
        description: state.blog_description.clone(),
        version: state.version.clone(),
    })
}
