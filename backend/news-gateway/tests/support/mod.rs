//! In-process fakes for the gateway's downstream collaborators
#![allow(dead_code)]

use actix_middleware::CorrelationContext;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use news_gateway::clients::{
    ClientError, CommentCreated, CommentSubmission, CommentView, CommentsApi, NewsApi,
    NewsDetail, NewsPage, NewsShort, Pagination, PolicyApi, ServiceClients,
};
use news_gateway::handlers::GatewayState;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn sample_news(id: i64) -> NewsDetail {
    NewsDetail {
        id,
        title: format!("Headline {}", id),
        content: "Body text".to_string(),
        pub_time: 1_700_000_000,
    }
}

pub fn sample_comments() -> Vec<CommentView> {
    vec![
        CommentView {
            id: 10,
            author: "ann".to_string(),
            text: "First".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        },
        CommentView {
            id: 11,
            author: "bob".to_string(),
            text: "Second".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
        },
    ]
}

/// Bookkeeping shared by every fake: call count, completion flag, seen request ids
#[derive(Default)]
pub struct Calls {
    pub count: AtomicU32,
    pub completed: AtomicBool,
    pub request_ids: Mutex<Vec<String>>,
}

impl Calls {
    fn record(&self, ctx: &CorrelationContext) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.request_ids.lock().push(ctx.request_id().to_string());
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

pub struct FakeNews {
    pub delay: Duration,
    pub result: Result<NewsDetail, ClientError>,
    pub calls: Calls,
    pub pages: Mutex<Vec<(Option<String>, u32)>>,
}

impl FakeNews {
    pub fn ok(delay: Duration) -> Arc<Self> {
        Self::with(delay, Ok(sample_news(1)))
    }

    pub fn failing(delay: Duration, err: ClientError) -> Arc<Self> {
        Self::with(delay, Err(err))
    }

    fn with(delay: Duration, result: Result<NewsDetail, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            delay,
            result,
            calls: Calls::default(),
            pages: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl NewsApi for FakeNews {
    async fn news_detail(
        &self,
        id: i64,
        ctx: &CorrelationContext,
    ) -> Result<NewsDetail, ClientError> {
        self.calls.record(ctx);
        tokio::time::sleep(self.delay).await;
        self.calls.completed.store(true, Ordering::SeqCst);
        self.result.clone().map(|mut news| {
            news.id = id;
            news
        })
    }

    async fn news_page(
        &self,
        query: Option<&str>,
        page: u32,
        ctx: &CorrelationContext,
    ) -> Result<NewsPage, ClientError> {
        self.calls.record(ctx);
        self.pages.lock().push((query.map(str::to_string), page));
        Ok(NewsPage {
            news: vec![NewsShort {
                id: 1,
                title: "Headline 1".to_string(),
                content: "Body text".to_string(),
                pub_time: 1_700_000_000,
                link: "https://example.org/1".to_string(),
            }],
            pagination: Pagination {
                total_pages: 4,
                current_page: page,
                items_per_page: 15,
            },
        })
    }
}

pub struct FakeComments {
    pub delay: Duration,
    pub result: Result<Vec<CommentView>, ClientError>,
    pub calls: Calls,
    pub created: Mutex<Vec<CommentSubmission>>,
}

impl FakeComments {
    pub fn ok(delay: Duration) -> Arc<Self> {
        Self::with(delay, Ok(sample_comments()))
    }

    pub fn failing(delay: Duration, err: ClientError) -> Arc<Self> {
        Self::with(delay, Err(err))
    }

    fn with(delay: Duration, result: Result<Vec<CommentView>, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            delay,
            result,
            calls: Calls::default(),
            created: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CommentsApi for FakeComments {
    async fn approved_comments(
        &self,
        _news_id: i64,
        ctx: &CorrelationContext,
    ) -> Result<Vec<CommentView>, ClientError> {
        self.calls.record(ctx);
        tokio::time::sleep(self.delay).await;
        self.calls.completed.store(true, Ordering::SeqCst);
        self.result.clone()
    }

    async fn create_comment(
        &self,
        submission: &CommentSubmission,
        ctx: &CorrelationContext,
    ) -> Result<CommentCreated, ClientError> {
        self.calls.record(ctx);
        let mut created = self.created.lock();
        created.push(submission.clone());
        Ok(CommentCreated {
            status: "ok".to_string(),
            id: created.len() as i64,
        })
    }
}

pub enum PolicyBehavior {
    Accept,
    Reject,
    Unreachable,
    Hang,
}

pub struct FakePolicy {
    pub behavior: PolicyBehavior,
    pub calls: Calls,
}

impl FakePolicy {
    pub fn new(behavior: PolicyBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Calls::default(),
        })
    }
}

#[async_trait]
impl PolicyApi for FakePolicy {
    async fn censor(&self, _text: &str, ctx: &CorrelationContext) -> Result<(), ClientError> {
        self.calls.record(ctx);
        match self.behavior {
            PolicyBehavior::Accept => Ok(()),
            PolicyBehavior::Reject => Err(ClientError::Status(400)),
            PolicyBehavior::Unreachable => {
                Err(ClientError::Transport("connection refused".to_string()))
            }
            PolicyBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

pub fn gateway_state(
    news: Arc<FakeNews>,
    comments: Arc<FakeComments>,
    policy: Arc<FakePolicy>,
    aggregate_budget: Duration,
) -> GatewayState {
    GatewayState::new(
        ServiceClients::new(news, comments, policy),
        aggregate_budget,
        Duration::from_millis(100),
    )
}
