//! Fan-out aggregation of a news item and its approved comments
//!
//! Each backend call runs on its own task inside a [`JoinSet`]. Results come
//! back as a tagged [`SubCallResult`] so the merge does not depend on which task
//! finishes first. The first failure, or the shared deadline, aborts every task
//! still running; no partial record is ever returned.

use crate::clients::{ClientError, CommentView, CommentsApi, NewsAggregate, NewsApi, NewsDetail};
use crate::error::GatewayError;
use crate::metrics::record_aggregate_outcome;
use actix_middleware::CorrelationContext;
use resilience::Deadline;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tracing::{warn, Instrument};

/// Result of one fan-out branch
#[derive(Debug)]
pub enum SubCallResult {
    News(NewsDetail),
    Comments(Vec<CommentView>),
    Error(ClientError),
}

pub struct Aggregator {
    news: Arc<dyn NewsApi>,
    comments: Arc<dyn CommentsApi>,
    budget: Duration,
}

impl Aggregator {
    pub fn new(news: Arc<dyn NewsApi>, comments: Arc<dyn CommentsApi>, budget: Duration) -> Self {
        Self {
            news,
            comments,
            budget,
        }
    }

    /// Fetch the news item and its approved comments concurrently.
    ///
    /// `news_id` must already be validated.
    pub async fn aggregate_detail(
        &self,
        news_id: i64,
        ctx: &CorrelationContext,
    ) -> Result<NewsAggregate, GatewayError> {
        let deadline = Deadline::after(self.budget);
        let result = self.fan_out(news_id, ctx, deadline).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(GatewayError::Unavailable) if deadline.is_elapsed() => "timeout",
            Err(_) => "error",
        };
        record_aggregate_outcome(outcome);

        if let Err(err) = &result {
            warn!(
                request_id = %ctx.request_id(),
                news_id,
                outcome,
                elapsed_ms = ctx.elapsed().as_millis() as u64,
                error = ?err,
                "Aggregate request failed"
            );
        }

        result
    }

    async fn fan_out(
        &self,
        news_id: i64,
        ctx: &CorrelationContext,
        deadline: Deadline,
    ) -> Result<NewsAggregate, GatewayError> {
        let mut tasks: JoinSet<SubCallResult> = JoinSet::new();

        {
            let news = self.news.clone();
            let ctx = ctx.clone();
            tasks.spawn(
                async move {
                    match deadline.run(news.news_detail(news_id, &ctx)).await {
                        Ok(Ok(detail)) => SubCallResult::News(detail),
                        Ok(Err(err)) => SubCallResult::Error(err),
                        Err(_) => SubCallResult::Error(ClientError::Timeout),
                    }
                }
                .instrument(tracing::Span::current()),
            );
        }

        {
            let comments = self.comments.clone();
            let ctx = ctx.clone();
            tasks.spawn(
                async move {
                    match deadline.run(comments.approved_comments(news_id, &ctx)).await {
                        Ok(Ok(list)) => SubCallResult::Comments(list),
                        Ok(Err(err)) => SubCallResult::Error(err),
                        Err(_) => SubCallResult::Error(ClientError::Timeout),
                    }
                }
                .instrument(tracing::Span::current()),
            );
        }

        let mut news: Option<NewsDetail> = None;
        let mut comments: Option<Vec<CommentView>> = None;

        let joined = deadline
            .run(async {
                while let Some(joined) = tasks.join_next().await {
                    if let Err(err) = merge(joined, &mut news, &mut comments) {
                        return Err(err);
                    }
                }
                Ok(())
            })
            .await;

        let merged = match joined {
            Ok(merged) => merged,
            Err(_) => Err(GatewayError::Unavailable),
        };

        if let Err(err) = merged {
            // Results of aborted tasks are never observed
            tasks.abort_all();
            return Err(err);
        }

        match (news, comments) {
            (Some(news), Some(comments)) => Ok(NewsAggregate::new(news, comments)),
            _ => Err(GatewayError::Internal(
                "fan-out finished without every result".to_string(),
            )),
        }
    }
}

fn merge(
    joined: Result<SubCallResult, JoinError>,
    news: &mut Option<NewsDetail>,
    comments: &mut Option<Vec<CommentView>>,
) -> Result<(), GatewayError> {
    match joined {
        Ok(SubCallResult::News(detail)) => {
            *news = Some(detail);
            Ok(())
        }
        Ok(SubCallResult::Comments(list)) => {
            *comments = Some(list);
            Ok(())
        }
        Ok(SubCallResult::Error(err)) => {
            warn!(error = %err, "Fan-out sub-call failed");
            Err(err.into())
        }
        Err(join_err) => Err(GatewayError::Internal(format!(
            "fan-out task failed: {}",
            join_err
        ))),
    }
}
