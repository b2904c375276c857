//! Comment API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use quill_store::NewComment;
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Request body for POST /api/comments.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCommentRequest {
    content: String,
    post_id: String,
    author_id: String,
}

/// Handle POST /api/comments.
pub(crate) async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let comment = state
        .store
        .add_comment(NewComment {
            content: request.content,
            post_id: request.post_id,
            author_id: request.author_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Handle DELETE /api/comments/{id}.
pub(crate) async fn delete_comment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    state.store.delete_comment(&id).await?;
    Ok(Json(serde_json::json!({ "message": "comment deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_accepts_camel_case() {
        let request: CreateCommentRequest = serde_json::from_str(
            r#"{ "content": "hi", "postId": "p1", "authorId": "a1" }"#,
        )
        .unwrap();
        assert_eq!(request.content, "hi");
        assert_eq!(request.post_id, "p1");
        assert_eq!(request.author_id, "a1");
    }

    #[test]
    fn test_create_comment_request_rejects_missing_post() {
        let result: Result<CreateCommentRequest, _> =
            serde_json::from_str(r#"{ "content": "hi", "authorId": "a1" }"#);
        assert!(result.is_err());
    }
}
