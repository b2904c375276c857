//! Live preview endpoint for the authoring surface.
//!
//! Accepts a draft body and returns the rendered HTML, so an editor can show
//! exactly what the display surface will inject later.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Request body for POST /api/preview.
#[derive(Deserialize)]
pub(crate) struct PreviewRequest {
    /// Draft markdown, may be empty.
    #[serde(default)]
    content: String,
}

/// Response for POST /api/preview.
#[derive(Serialize)]
pub(crate) struct PreviewResponse {
    /// Rendered HTML for the draft.
    html: String,
}

/// Handle POST /api/preview.
///
/// Pure function of the request body; rendering never fails, so neither does
/// this endpoint.
pub(crate) async fn preview(Json(request): Json<PreviewRequest>) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: quill_renderer::render(&request.content),
    })
}
