use crate::aggregator::Aggregator;
use crate::clients::{CommentSubmission, ServiceClients};
use crate::error::{GatewayError, Result};
use crate::moderation::{ModerationGate, PolicyDecision};
use actix_middleware::CorrelationContext;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// Shared gateway state
pub struct GatewayState {
    pub clients: ServiceClients,
    pub aggregator: Aggregator,
    pub gate: ModerationGate,
}

impl GatewayState {
    pub fn new(clients: ServiceClients, aggregate_budget: Duration, policy_timeout: Duration) -> Self {
        Self {
            aggregator: Aggregator::new(
                clients.news.clone(),
                clients.comments.clone(),
                aggregate_budget,
            ),
            gate: ModerationGate::new(clients.policy.clone(), policy_timeout),
            clients,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsDetailQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsListQuery {
    pub s: Option<String>,
    pub page: Option<String>,
}

/// GET /news/detail?id=
pub async fn news_detail(
    ctx: CorrelationContext,
    state: web::Data<GatewayState>,
    query: web::Query<NewsDetailQuery>,
) -> Result<HttpResponse> {
    let news_id = parse_news_id(query.id.as_deref())?;
    let aggregate = state.aggregator.aggregate_detail(news_id, &ctx).await?;

    Ok(HttpResponse::Ok().json(aggregate))
}

/// POST /comment/add
///
/// Validates, runs the moderation gate, then forwards the write. A rejected
/// comment is never sent to the comments service.
pub async fn add_comment(
    ctx: CorrelationContext,
    state: web::Data<GatewayState>,
    body: web::Json<CommentSubmission>,
) -> Result<HttpResponse> {
    let submission = body.into_inner().normalized();
    submission.validate()?;

    if let PolicyDecision::Reject(reason) = state.gate.check_policy(&submission.text, &ctx).await {
        return Err(GatewayError::PolicyRejection(reason));
    }

    let created = state
        .clients
        .comments
        .create_comment(&submission, &ctx)
        .await?;

    tracing::info!(
        request_id = %ctx.request_id(),
        comment_id = created.id,
        news_id = submission.news_id,
        "Comment accepted for moderation"
    );

    Ok(HttpResponse::Ok().json(created))
}

/// GET /news?s=&page=
pub async fn news_list(
    ctx: CorrelationContext,
    state: web::Data<GatewayState>,
    query: web::Query<NewsListQuery>,
) -> Result<HttpResponse> {
    let page = parse_page(query.page.as_deref());
    let search = query.s.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let news_page = state.clients.news.news_page(search, page, &ctx).await?;

    Ok(HttpResponse::Ok().json(news_page))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// A news id is a positive integer
fn parse_news_id(raw: Option<&str>) -> Result<i64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GatewayError::Validation("id is required".to_string()))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(GatewayError::Validation(format!(
            "id must be a positive integer, got {:?}",
            raw
        ))),
    }
}

/// Missing, malformed or non-positive pages fall back to the first page
fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_news_id() {
        assert_eq!(parse_news_id(Some("12")).unwrap(), 12);
        assert!(matches!(parse_news_id(None), Err(GatewayError::Validation(_))));
        assert!(parse_news_id(Some("  ")).is_err());
        assert!(parse_news_id(Some("0")).is_err());
        assert!(parse_news_id(Some("-5")).is_err());
        assert!(parse_news_id(Some("12abc")).is_err());
        assert!(parse_news_id(Some("99999999999999999999")).is_err());
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(Some("two")), 1);
    }
}
