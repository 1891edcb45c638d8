//! Comment persistence
//!
//! The moderation worker is the only caller of [`CommentStore::finalize`]; every
//! other field is written once by [`CommentStore::insert`].

pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::models::{Comment, NewComment};
use async_trait::async_trait;

pub use memory::MemoryCommentStore;
pub use postgres::PgCommentStore;

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment in the pending state
    async fn insert(&self, comment: &NewComment) -> Result<Comment>;

    /// Approved comments of one news item, oldest first
    async fn approved_for_news(&self, news_id: i64) -> Result<Vec<Comment>>;

    async fn get(&self, id: i64) -> Result<Option<Comment>>;

    /// Move a pending comment to approved or rejected.
    ///
    /// Returns `false` when the comment is missing or already final.
    async fn finalize(&self, id: i64, approved: bool) -> Result<bool>;
}
