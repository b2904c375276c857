//! The SQLite-backed store.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{
    Author, Comment, NewAuthor, NewComment, NewPost, Post, PostDetail, PostSummary, UpdatePost,
};
use crate::slug::slugify;

/// Default excerpt length when none is supplied, in characters.
const EXCERPT_LENGTH: usize = 150;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS authors (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        display_name TEXT,
        avatar_url TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        content TEXT NOT NULL,
        excerpt TEXT NOT NULL,
        cover_image TEXT,
        published INTEGER NOT NULL DEFAULT 0,
        author_id TEXT NOT NULL REFERENCES authors(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id TEXT PRIMARY KEY,
        content TEXT NOT NULL,
        post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        author_id TEXT NOT NULL REFERENCES authors(id),
        created_at TEXT NOT NULL
    )",
];

/// Blog content store over a SQLite connection pool.
///
/// Cheap to clone; all clones share the pool. The schema is bootstrapped on
/// connect, so a fresh database file is usable immediately.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (and if needed create) the database at `database`, or an
    /// in-memory database for the literal path `:memory:`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub async fn connect(database: &str) -> Result<Self, StoreError> {
        let pool = if database == ":memory:" {
            // A pooled in-memory database must keep its single connection
            // alive; every new connection would see an empty schema.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::new().in_memory(true).foreign_keys(true))
                .await?
        } else {
            SqlitePoolOptions::new()
                .connect_with(
                    SqliteConnectOptions::new()
                        .filename(database)
                        .create_if_missing(true)
                        .foreign_keys(true),
                )
                .await?
        };

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    // Authors

    /// Create an author record.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty username, `Database` on conflicts.
    pub async fn create_author(&self, new: NewAuthor) -> Result<Author, StoreError> {
        if new.username.trim().is_empty() {
            return Err(StoreError::Validation("username is required".to_owned()));
        }

        let author = Author {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            display_name: new.display_name,
            avatar_url: new.avatar_url,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO authors (id, username, display_name, avatar_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&author.id)
        .bind(&author.username)
        .bind(&author.display_name)
        .bind(&author.avatar_url)
        .bind(author.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %author.id, username = %author.username, "author created");
        Ok(author)
    }

    /// Fetch an author by id.
    pub async fn get_author(&self, id: &str) -> Result<Option<Author>, StoreError> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, username, display_name, avatar_url, created_at
             FROM authors WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    // Posts

    /// Create a post. The slug is derived from the title with a millisecond
    /// timestamp suffix for uniqueness; the excerpt defaults to the first
    /// characters of the content.
    ///
    /// # Errors
    ///
    /// `Validation` when title, content or author id is empty.
    pub async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        if new.title.trim().is_empty() || new.content.trim().is_empty() || new.author_id.is_empty()
        {
            return Err(StoreError::Validation(
                "title, content and author are required".to_owned(),
            ));
        }

        let now = Utc::now();
        let slug = format!("{}-{}", slugify(&new.title), now.timestamp_millis());
        let excerpt = new
            .excerpt
            .unwrap_or_else(|| new.content.chars().take(EXCERPT_LENGTH).collect());

        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            slug,
            content: new.content,
            excerpt,
            cover_image: new.cover_image,
            published: new.published,
            author_id: new.author_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO posts (id, title, slug, content, excerpt, cover_image, published,
                                author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.cover_image)
        .bind(post.published)
        .bind(&post.author_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(slug = %post.slug, "post created");
        Ok(post)
    }

    /// Fetch a post by slug with its author and comments (newest first).
    pub async fn get_post(&self, slug: &str) -> Result<Option<PostDetail>, StoreError> {
        let Some(post) = self.post_by_slug(slug).await? else {
            return Ok(None);
        };
        let author = self
            .get_author(&post.author_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("author '{}'", post.author_id)))?;
        let comments = self.comments_for_post(&post.id).await?;
        Ok(Some(PostDetail {
            post,
            author,
            comments,
        }))
    }

    /// List published posts, newest first, without their content.
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, StoreError> {
        let rows = sqlx::query_as::<_, PostSummaryRow>(
            "SELECT p.id, p.title, p.slug, p.excerpt, p.cover_image, p.created_at, p.updated_at,
                    a.id AS author_id, a.username AS author_username,
                    a.display_name AS author_display_name, a.avatar_url AS author_avatar_url,
                    a.created_at AS author_created_at
             FROM posts p
             JOIN authors a ON a.id = p.author_id
             WHERE p.published = 1
             ORDER BY p.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PostSummary::from).collect())
    }

    /// Apply a partial update to the post with the given slug.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown slug, `Validation` for empty replacement
    /// title or content.
    pub async fn update_post(&self, slug: &str, update: UpdatePost) -> Result<Post, StoreError> {
        if matches!(&update.title, Some(t) if t.trim().is_empty())
            || matches!(&update.content, Some(c) if c.trim().is_empty())
        {
            return Err(StoreError::Validation(
                "title and content cannot be empty".to_owned(),
            ));
        }

        let result = sqlx::query(
            "UPDATE posts SET
                title = COALESCE(?1, title),
                content = COALESCE(?2, content),
                excerpt = COALESCE(?3, excerpt),
                cover_image = COALESCE(?4, cover_image),
                published = COALESCE(?5, published),
                updated_at = ?6
             WHERE slug = ?7",
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.excerpt)
        .bind(&update.cover_image)
        .bind(update.published)
        .bind(Utc::now())
        .bind(slug)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("post '{slug}'")));
        }

        self.post_by_slug(slug)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("post '{slug}'")))
    }

    /// Delete the post with the given slug. Its comments go with it.
    pub async fn delete_post(&self, slug: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE slug = ?1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("post '{slug}'")));
        }
        tracing::debug!(slug, "post deleted");
        Ok(())
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, slug, content, excerpt, cover_image, published, author_id,
                    created_at, updated_at
             FROM posts WHERE slug = ?1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    // Comments

    /// Add a comment to a post.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty body, `NotFound` for an unknown post or
    /// author.
    pub async fn add_comment(&self, new: NewComment) -> Result<Comment, StoreError> {
        if new.content.trim().is_empty() {
            return Err(StoreError::Validation("comment body is required".to_owned()));
        }

        let post_exists = sqlx::query("SELECT 1 FROM posts WHERE id = ?1")
            .bind(&new.post_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !post_exists {
            return Err(StoreError::NotFound(format!("post '{}'", new.post_id)));
        }

        let author = self
            .get_author(&new.author_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("author '{}'", new.author_id)))?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            content: new.content,
            post_id: new.post_id,
            author,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO comments (id, content, post_id, author_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&comment.id)
        .bind(&comment.content)
        .bind(&comment.post_id)
        .bind(&comment.author.id)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(post_id = %comment.post_id, "comment added");
        Ok(comment)
    }

    /// Comments on a post, newest first, each with its author.
    pub async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT c.id, c.content, c.post_id, c.created_at,
                    a.id AS author_id, a.username AS author_username,
                    a.display_name AS author_display_name, a.avatar_url AS author_avatar_url,
                    a.created_at AS author_created_at
             FROM comments c
             JOIN authors a ON a.id = c.author_id
             WHERE c.post_id = ?1
             ORDER BY c.created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Delete a comment by id.
    pub async fn delete_comment(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("comment '{id}'")));
        }
        Ok(())
    }
}

/// Flat row for the post listing join.
#[derive(sqlx::FromRow)]
struct PostSummaryRow {
    id: String,
    title: String,
    slug: String,
    excerpt: String,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: String,
    author_username: String,
    author_display_name: Option<String>,
    author_avatar_url: Option<String>,
    author_created_at: DateTime<Utc>,
}

impl From<PostSummaryRow> for PostSummary {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            cover_image: row.cover_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: Author {
                id: row.author_id,
                username: row.author_username,
                display_name: row.author_display_name,
                avatar_url: row.author_avatar_url,
                created_at: row.author_created_at,
            },
        }
    }
}

/// Flat row for the comment join.
#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    content: String,
    post_id: String,
    created_at: DateTime<Utc>,
    author_id: String,
    author_username: String,
    author_display_name: Option<String>,
    author_avatar_url: Option<String>,
    author_created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            post_id: row.post_id,
            created_at: row.created_at,
            author: Author {
                id: row.author_id,
                username: row.author_username,
                display_name: row.author_display_name,
                avatar_url: row.author_avatar_url,
                created_at: row.author_created_at,
            },
        }
    }
}
