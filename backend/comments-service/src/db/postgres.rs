use super::CommentStore;
use crate::error::Result;
use crate::models::{Comment, NewComment};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn insert(&self, comment: &NewComment) -> Result<Comment> {
        let row = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (news_id, parent_id, author, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, news_id, parent_id, author, text, created_at, approved, moderated_at
            "#,
        )
        .bind(comment.news_id)
        .bind(comment.parent_id)
        .bind(&comment.author)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn approved_for_news(&self, news_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, news_id, parent_id, author, text, created_at, approved, moderated_at
            FROM comments
            WHERE news_id = $1 AND approved = TRUE
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(news_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, news_id, parent_id, author, text, created_at, approved, moderated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn finalize(&self, id: i64, approved: bool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET approved = $2, moderated_at = NOW()
            WHERE id = $1 AND moderated_at IS NULL
            "#,
        )
        .bind(id)
        .bind(approved)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
