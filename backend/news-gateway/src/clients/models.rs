use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// News item as returned by the news service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsShort {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_time: i64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_pages: u32,
    pub current_page: u32,
    pub items_per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsPage {
    #[serde(default)]
    pub news: Vec<NewsShort>,
    pub pagination: Pagination,
}

/// Approved comment as exposed to readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /comment/add`, forwarded unchanged once accepted
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentSubmission {
    #[validate(range(min = 1, message = "news_id must be positive"))]
    pub news_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "parent_id must be positive"))]
    pub parent_id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "author must be 1-50 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 5000, message = "text must be 1-5000 characters"))]
    pub text: String,
}

impl CommentSubmission {
    pub fn normalized(self) -> Self {
        Self {
            author: self.author.trim().to_string(),
            text: self.text.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentCreated {
    pub status: String,
    pub id: i64,
}

/// Merged news item and its approved comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsAggregate {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_time: i64,
    pub comments: Vec<CommentView>,
}

impl NewsAggregate {
    pub fn new(news: NewsDetail, comments: Vec<CommentView>) -> Self {
        Self {
            id: news.id,
            title: news.title,
            content: news.content,
            pub_time: news.pub_time,
            comments,
        }
    }
}
