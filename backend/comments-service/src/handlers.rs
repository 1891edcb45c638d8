use crate::db::CommentStore;
use crate::error::{CommentsError, Result};
use crate::models::{CommentView, CommentsQuery, CreateCommentResponse, NewComment};
use crate::moderation::ModerationQueue;
use actix_middleware::CorrelationContext;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CommentStore>,
    pub queue: ModerationQueue,
}

/// POST /comments
///
/// Stores the comment as pending and queues it for moderation. Waits for a
/// queue slot before writing, so a request abandoned under backpressure
/// leaves no row behind.
pub async fn create_comment(
    ctx: CorrelationContext,
    state: web::Data<AppState>,
    body: web::Json<NewComment>,
) -> Result<HttpResponse> {
    let submission = body.into_inner().normalized();
    submission.validate()?;

    let slot = state.queue.reserve().await.map_err(|err| {
        tracing::error!(
            request_id = %ctx.request_id(),
            news_id = submission.news_id,
            "Moderation queue closed, comment not stored"
        );
        err
    })?;

    let comment = state.store.insert(&submission).await?;
    slot.send(comment.id);

    tracing::debug!(
        request_id = %ctx.request_id(),
        comment_id = comment.id,
        news_id = comment.news_id,
        "Comment queued for moderation"
    );

    Ok(HttpResponse::Ok().json(CreateCommentResponse {
        status: "ok".to_string(),
        id: comment.id,
    }))
}

/// GET /comments?news_id=
///
/// Approved comments only, oldest first.
pub async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<CommentsQuery>,
) -> Result<HttpResponse> {
    let news_id = parse_news_id(query.news_id.as_deref())?;

    let comments: Vec<CommentView> = state
        .store
        .approved_for_news(news_id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

fn parse_news_id(raw: Option<&str>) -> Result<i64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CommentsError::Validation("news_id is required".to_string()))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CommentsError::Validation(format!(
            "news_id must be a positive integer, got {:?}",
            raw
        ))),
    }
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_news_id() {
        assert_eq!(parse_news_id(Some("42")).unwrap(), 42);
        assert_eq!(parse_news_id(Some(" 7 ")).unwrap(), 7);
        assert!(parse_news_id(None).is_err());
        assert!(parse_news_id(Some("")).is_err());
        assert!(parse_news_id(Some("0")).is_err());
        assert!(parse_news_id(Some("-3")).is_err());
        assert!(parse_news_id(Some("abc")).is_err());
    }
}
