//! Application state.
//!
//! Shared state for all request handlers.

use quill_store::Store;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Blog content store.
    pub(crate) store: Store,
    /// Blog title shown to readers.
    pub(crate) blog_title: String,
    /// Optional blog description.
    pub(crate) blog_description: Option<String>,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}
