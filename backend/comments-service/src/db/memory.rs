use super::CommentStore;
use crate::error::Result;
use crate::models::{Comment, ModerationState, NewComment};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-process store used when no database is configured
#[derive(Default)]
pub struct MemoryCommentStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Comment>,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn insert(&self, comment: &NewComment) -> Result<Comment> {
        let mut inner = self.inner.write();
        inner.last_id += 1;

        let row = Comment {
            id: inner.last_id,
            news_id: comment.news_id,
            parent_id: comment.parent_id,
            author: comment.author.clone(),
            text: comment.text.clone(),
            created_at: Utc::now(),
            approved: false,
            moderated_at: None,
        };
        inner.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn approved_for_news(&self, news_id: i64) -> Result<Vec<Comment>> {
        let inner = self.inner.read();
        let mut rows: Vec<Comment> = inner
            .rows
            .values()
            .filter(|c| c.news_id == news_id && c.approved)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.inner.read().rows.get(&id).cloned())
    }

    async fn finalize(&self, id: i64, approved: bool) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.rows.get_mut(&id) {
            Some(row) if row.state() == ModerationState::Pending => {
                row.approved = approved;
                row.moderated_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
