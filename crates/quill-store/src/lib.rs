//! SQLite persistence for quill blog content.
//!
//! This crate owns the relational schema (authors, posts, comments) and
//! exposes conventional create/read/update/delete operations keyed by ids
//! and slugs. It performs no rendering; post content is stored as the
//! author wrote it and rendered at display time by `quill-renderer`.
//!
//! # Example
//!
//! ```ignore
//! use quill_store::{NewAuthor, NewPost, Store};
//!
//! let store = Store::connect(":memory:").await?;
//! let author = store.create_author(NewAuthor::new("ada")).await?;
//! let post = store
//!     .create_post(NewPost {
//!         title: "First post".to_owned(),
//!         content: "# Hello".to_owned(),
//!         excerpt: None,
//!         cover_image: None,
//!         published: true,
//!         author_id: author.id.clone(),
//!     })
//!     .await?;
//! assert!(post.slug.starts_with("first-post-"));
//! ```

mod error;
mod model;
mod slug;
mod store;

pub use error::StoreError;
pub use model::{
    Author, Comment, NewAuthor, NewComment, NewPost, Post, PostDetail, PostSummary, UpdatePost,
};
pub use store::Store;
