//! Post API endpoints.
//!
//! Listing and mutation work on stored markdown; the single-post endpoint
//! also returns `contentHtml`, rendered immediately before the response is
//! handed to the display surface.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use md5::{Digest, Md5};
use quill_store::{NewPost, Post, PostDetail, PostSummary, UpdatePost};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/posts.
#[derive(Serialize)]
struct PostListResponse {
    /// Published post summaries, newest first.
    posts: Vec<PostSummary>,
    /// Number of posts returned.
    total: usize,
}

/// Response for GET /api/posts/{slug}.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostResponse {
    /// Post fields with author and comments.
    #[serde(flatten)]
    detail: PostDetail,
    /// Rendered HTML, safe for direct injection.
    content_html: String,
}

/// Request body for POST /api/posts.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePostRequest {
    title: String,
    content: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    cover_image: Option<String>,
    #[serde(default)]
    published: bool,
    author_id: String,
}

/// Request body for PUT /api/posts/{slug}.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePostRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    cover_image: Option<String>,
    #[serde(default)]
    published: Option<bool>,
}

/// Handle GET /api/posts.
pub(crate) async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let posts = state.store.list_posts().await?;
    let total = posts.len();
    Ok(Json(PostListResponse { posts, total }))
}

/// Handle POST /api/posts.
pub(crate) async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let post = state
        .store
        .create_post(NewPost {
            title: request.title,
            content: request.content,
            excerpt: request.excerpt,
            cover_image: request.cover_image,
            published: request.published,
            author_id: request.author_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Handle GET /api/posts/{slug}.
pub(crate) async fn get_post(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let detail = state
        .store
        .get_post(&slug)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("post '{slug}'")))?;

    // Render at the edge; clients inject contentHtml as-is.
    let content_html = quill_renderer::render(&detail.post.content);

    // Compute ETag
    let etag = compute_etag(&state.version, &content_html);

    // Check If-None-Match header for conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let last_modified = detail
        .post
        .updated_at
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    let response = PostResponse {
        detail,
        content_html,
    };

    Ok((
        [
            (header::ETAG, etag),
            (header::LAST_MODIFIED, last_modified),
            (header::CACHE_CONTROL, "private, max-age=60".to_string()),
        ],
        Json(response),
    )
        .into_response())
}

/// Handle PUT /api/posts/{slug}.
pub(crate) async fn update_post(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ServerError> {
    let post = state
        .store
        .update_post(
            &slug,
            UpdatePost {
                title: request.title,
                content: request.content,
                excerpt: request.excerpt,
                cover_image: request.cover_image,
                published: request.published,
            },
        )
        .await?;
    Ok(Json(post))
}

/// Handle DELETE /api/posts/{slug}.
pub(crate) async fn delete_post(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    state.store.delete_post(&slug).await?;
    Ok(Json(serde_json::json!({ "message": "post deleted" })))
}

/// Compute `ETag` from version and rendered content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
