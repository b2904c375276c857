//! Data model for blog content.
//!
//! JSON field casing follows the HTTP API (camelCase).

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered author. Authentication is out of scope; authors are plain
/// records that posts and comments reference.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an author.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewAuthor {
    /// Author with just a username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: None,
            avatar_url: None,
        }
    }
}

/// A stored post, content as authored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection: everything but the content, plus the author.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

/// A post with its author and comments (newest first).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub comments: Vec<Comment>,
}

/// Payload for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// Defaults to a prefix of the content when absent.
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_id: String,
}

/// Partial update for a post; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
}

/// A comment with its author.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: String,
    pub author_id: String,
}
