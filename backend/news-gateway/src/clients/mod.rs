//! Downstream service clients
//!
//! One trait per collaborator so the aggregator and the moderation gate can be
//! exercised against in-process fakes. Every call carries the caller's
//! [`CorrelationContext`], forwarded as the `request_id` query parameter.

pub mod http;
pub mod models;

use actix_middleware::CorrelationContext;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use http::{HttpCensorClient, HttpCommentsClient, HttpNewsClient};
pub use models::*;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("resource not found")]
    NotFound,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn news_detail(
        &self,
        id: i64,
        ctx: &CorrelationContext,
    ) -> Result<NewsDetail, ClientError>;

    async fn news_page(
        &self,
        query: Option<&str>,
        page: u32,
        ctx: &CorrelationContext,
    ) -> Result<NewsPage, ClientError>;
}

#[async_trait]
pub trait CommentsApi: Send + Sync {
    /// Approved comments of one news item, oldest first
    async fn approved_comments(
        &self,
        news_id: i64,
        ctx: &CorrelationContext,
    ) -> Result<Vec<CommentView>, ClientError>;

    async fn create_comment(
        &self,
        submission: &CommentSubmission,
        ctx: &CorrelationContext,
    ) -> Result<CommentCreated, ClientError>;
}

#[async_trait]
pub trait PolicyApi: Send + Sync {
    /// `Ok` only when the checker explicitly accepted the text
    async fn censor(&self, text: &str, ctx: &CorrelationContext) -> Result<(), ClientError>;
}

/// Handles to every downstream collaborator
#[derive(Clone)]
pub struct ServiceClients {
    pub news: Arc<dyn NewsApi>,
    pub comments: Arc<dyn CommentsApi>,
    pub policy: Arc<dyn PolicyApi>,
}

impl ServiceClients {
    pub fn new(
        news: Arc<dyn NewsApi>,
        comments: Arc<dyn CommentsApi>,
        policy: Arc<dyn PolicyApi>,
    ) -> Self {
        Self {
            news,
            comments,
            policy,
        }
    }
}
