//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/config", get(handlers::config::get_config))
        .route(
            "/api/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route(
            "/api/posts/{slug}",
            get(handlers::posts::get_post)
                .put(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        )
        .route("/api/comments", post(handlers::comments::create_comment))
        .route(
            "/api/comments/{id}",
            delete(handlers::comments::delete_comment),
        )
        .route("/api/preview", post(handlers::preview::preview));

    // Add tracing and security headers middleware
    Router::new()
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use quill_store::Store;

    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn test_router_builds_with_all_routes() {
        let store = Store::connect(":memory:").await.unwrap();
        let state = Arc::new(AppState {
            store,
            blog_title: "Test".to_owned(),
            blog_description: None,
            version: "0.0.0".to_owned(),
        });
        let _router = create_router(state);
    }
}
