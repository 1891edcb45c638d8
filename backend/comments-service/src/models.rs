use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Moderation state derived from the persisted columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationState {
    Pending,
    Approved,
    Rejected,
}

/// Stored comment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub news_id: i64,
    pub parent_id: Option<i64>,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub approved: bool,
    pub moderated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn state(&self) -> ModerationState {
        match (self.approved, self.moderated_at) {
            (true, _) => ModerationState::Approved,
            (false, Some(_)) => ModerationState::Rejected,
            (false, None) => ModerationState::Pending,
        }
    }
}

/// Public shape of an approved comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentView {
    pub id: i64,
    pub news_id: i64,
    pub parent_id: Option<i64>,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            news_id: comment.news_id,
            parent_id: comment.parent_id,
            author: comment.author,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// Request body of `POST /comments`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
    #[validate(range(min = 1, message = "news_id must be positive"))]
    pub news_id: i64,
    #[validate(range(min = 1, message = "parent_id must be positive"))]
    pub parent_id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "author must be 1-50 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 5000, message = "text must be 1-5000 characters"))]
    pub text: String,
}

impl NewComment {
    /// Trim surrounding whitespace before validation and storage
    pub fn normalized(self) -> Self {
        Self {
            author: self.author.trim().to_string(),
            text: self.text.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentResponse {
    pub status: String,
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub news_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(approved: bool, moderated: bool) -> Comment {
        Comment {
            id: 1,
            news_id: 1,
            parent_id: None,
            author: "ann".into(),
            text: "hello".into(),
            created_at: Utc::now(),
            approved,
            moderated_at: moderated.then(Utc::now),
        }
    }

    #[test]
    fn test_state_derivation() {
        assert_eq!(comment(false, false).state(), ModerationState::Pending);
        assert_eq!(comment(true, true).state(), ModerationState::Approved);
        assert_eq!(comment(false, true).state(), ModerationState::Rejected);
    }

    #[test]
    fn test_validation_after_trim() {
        let blank = NewComment {
            news_id: 1,
            parent_id: None,
            author: "   ".into(),
            text: "ok".into(),
        }
        .normalized();
        assert!(blank.validate().is_err());

        let long_author = NewComment {
            news_id: 1,
            parent_id: None,
            author: "a".repeat(51),
            text: "ok".into(),
        };
        assert!(long_author.validate().is_err());

        let bad_parent = NewComment {
            news_id: 1,
            parent_id: Some(0),
            author: "ann".into(),
            text: "ok".into(),
        };
        assert!(bad_parent.validate().is_err());

        let good = NewComment {
            news_id: 7,
            parent_id: Some(3),
            author: "  ann ".into(),
            text: " first! ".into(),
        }
        .normalized();
        assert!(good.validate().is_ok());
        assert_eq!(good.author, "ann");
        assert_eq!(good.text, "first!");
    }
}
