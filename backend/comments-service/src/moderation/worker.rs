use super::queue::ModerationReceiver;
use crate::db::CommentStore;
use crate::error::CommentsError;
use crate::metrics::record_moderation_outcome;
use crate::models::ModerationState;
use content_policy::BannedTerms;
use resilience::{with_retry, RetryConfig, RetryError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Result of moderating one queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    Approved,
    Rejected,
    /// Comment was no longer pending (duplicate entry)
    AlreadyFinal,
    /// Store failed or the comment vanished; the comment stays pending
    Dropped,
}

impl ModerationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationOutcome::Approved => "approved",
            ModerationOutcome::Rejected => "rejected",
            ModerationOutcome::AlreadyFinal => "already_final",
            ModerationOutcome::Dropped => "dropped",
        }
    }
}

/// Single consumer of the moderation queue and sole writer of approval state
pub struct ModerationWorker {
    store: Arc<dyn CommentStore>,
    policy: Arc<BannedTerms>,
    retry: RetryConfig,
}

impl ModerationWorker {
    pub fn new(store: Arc<dyn CommentStore>, policy: Arc<BannedTerms>, retry: RetryConfig) -> Self {
        Self {
            store,
            policy,
            retry,
        }
    }

    /// Spawn the worker loop. The task ends once every queue sender is dropped
    /// and the remaining entries are drained.
    pub fn spawn(self, receiver: ModerationReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    pub async fn run(self, mut receiver: ModerationReceiver) {
        info!("Moderation worker started");

        while let Some(comment_id) = receiver.recv().await {
            self.process(comment_id).await;
        }

        info!("Moderation worker stopped (queue closed)");
    }

    /// Moderate one comment. Never fails; errors are logged and counted.
    pub async fn process(&self, comment_id: i64) -> ModerationOutcome {
        let outcome = match self.moderate(comment_id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let attempts = err.attempts();
                error!(
                    comment_id,
                    attempts,
                    error = %err.into_last(),
                    "Moderation failed, comment stays pending"
                );
                ModerationOutcome::Dropped
            }
        };

        record_moderation_outcome(outcome.as_str());
        outcome
    }

    async fn moderate(
        &self,
        comment_id: i64,
    ) -> Result<ModerationOutcome, RetryError<CommentsError>> {
        let store = &self.store;

        // Policy runs against the persisted text, not the submitted body
        let comment = with_retry(&self.retry, "load_comment", move || store.get(comment_id)).await?;

        let Some(comment) = comment else {
            warn!(comment_id, "Queued comment not found, dropping entry");
            return Ok(ModerationOutcome::Dropped);
        };

        if comment.state() != ModerationState::Pending {
            info!(comment_id, "Comment already moderated, skipping");
            return Ok(ModerationOutcome::AlreadyFinal);
        }

        let verdict = self.policy.check(&comment.text);
        let approved = verdict.is_clean();

        let applied = with_retry(&self.retry, "finalize_comment", move || {
            store.finalize(comment_id, approved)
        })
        .await?;

        if !applied {
            info!(comment_id, "Comment finalized concurrently, skipping");
            return Ok(ModerationOutcome::AlreadyFinal);
        }

        info!(
            comment_id,
            news_id = comment.news_id,
            approved,
            "Comment moderated"
        );

        Ok(if approved {
            ModerationOutcome::Approved
        } else {
            ModerationOutcome::Rejected
        })
    }
}
