//! reqwest implementations of the downstream client traits
//!
//! All three share one connection pool; the pool's request timeout is the
//! outer bound on any single downstream call.

use super::{
    ClientError, CommentCreated, CommentSubmission, CommentView, CommentsApi, NewsApi,
    NewsDetail, NewsPage, PolicyApi, ServiceClients,
};
use crate::config::{ServiceEndpoints, TimeoutConfig};
use actix_middleware::{CorrelationContext, REQUEST_ID_PARAM};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Build a client with the configured per-request timeout
pub fn build_http_client(timeouts: &TimeoutConfig) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(timeouts.downstream)
        .connect_timeout(timeouts.downstream)
        .build()
        .map_err(ClientError::from)
}

impl ServiceClients {
    /// HTTP clients for every collaborator, sharing one connection pool
    pub fn http(
        endpoints: &ServiceEndpoints,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, ClientError> {
        let client = build_http_client(timeouts)?;

        Ok(Self::new(
            Arc::new(HttpNewsClient::new(client.clone(), &endpoints.news_service)),
            Arc::new(HttpCommentsClient::new(
                client.clone(),
                &endpoints.comments_service,
            )),
            Arc::new(HttpCensorClient::new(client, &endpoints.censor_service)),
        ))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }

    response.json::<T>().await.map_err(ClientError::from)
}

fn base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[derive(Clone)]
pub struct HttpNewsClient {
    client: Client,
    base_url: String,
}

impl HttpNewsClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base(base_url),
        }
    }
}

#[async_trait]
impl NewsApi for HttpNewsClient {
    async fn news_detail(
        &self,
        id: i64,
        ctx: &CorrelationContext,
    ) -> Result<NewsDetail, ClientError> {
        let response = self
            .client
            .get(format!("{}/news/detail/{}", self.base_url, id))
            .query(&[(REQUEST_ID_PARAM, ctx.request_id())])
            .send()
            .await?;

        decode(response).await
    }

    async fn news_page(
        &self,
        query: Option<&str>,
        page: u32,
        ctx: &CorrelationContext,
    ) -> Result<NewsPage, ClientError> {
        let page = page.to_string();
        let response = self
            .client
            .get(format!("{}/news", self.base_url))
            .query(&[
                ("s", query.unwrap_or_default()),
                ("page", page.as_str()),
                (REQUEST_ID_PARAM, ctx.request_id()),
            ])
            .send()
            .await?;

        decode(response).await
    }
}

#[derive(Clone)]
pub struct HttpCommentsClient {
    client: Client,
    base_url: String,
}

impl HttpCommentsClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base(base_url),
        }
    }
}

#[async_trait]
impl CommentsApi for HttpCommentsClient {
    async fn approved_comments(
        &self,
        news_id: i64,
        ctx: &CorrelationContext,
    ) -> Result<Vec<CommentView>, ClientError> {
        let news_id = news_id.to_string();
        let response = self
            .client
            .get(format!("{}/comments", self.base_url))
            .query(&[
                ("news_id", news_id.as_str()),
                (REQUEST_ID_PARAM, ctx.request_id()),
            ])
            .send()
            .await?;

        // `null` is treated as an empty list
        let comments: Option<Vec<CommentView>> = decode(response).await?;
        Ok(comments.unwrap_or_default())
    }

    async fn create_comment(
        &self,
        submission: &CommentSubmission,
        ctx: &CorrelationContext,
    ) -> Result<CommentCreated, ClientError> {
        let response = self
            .client
            .post(format!("{}/comments", self.base_url))
            .query(&[(REQUEST_ID_PARAM, ctx.request_id())])
            .json(submission)
            .send()
            .await?;

        decode(response).await
    }
}

#[derive(Serialize)]
struct CensorRequest<'a> {
    text: &'a str,
}

#[derive(Clone)]
pub struct HttpCensorClient {
    client: Client,
    base_url: String,
}

impl HttpCensorClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base(base_url),
        }
    }
}

#[async_trait]
impl PolicyApi for HttpCensorClient {
    async fn censor(&self, text: &str, ctx: &CorrelationContext) -> Result<(), ClientError> {
        let response = self
            .client
            .post(format!("{}/censor", self.base_url))
            .query(&[(REQUEST_ID_PARAM, ctx.request_id())])
            .json(&CensorRequest { text })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(status.as_u16()))
        }
    }
}
