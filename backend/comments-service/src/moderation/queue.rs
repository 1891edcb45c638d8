use crate::error::{CommentsError, Result};
use tokio::sync::mpsc;

/// Receiving half, owned by the moderation worker
pub type ModerationReceiver = mpsc::Receiver<i64>;

/// Sending half shared by request handlers
#[derive(Clone)]
pub struct ModerationQueue {
    sender: mpsc::Sender<i64>,
}

/// Create a bounded moderation queue holding at most `capacity` pending ids
pub fn moderation_queue(capacity: usize) -> (ModerationQueue, ModerationReceiver) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (ModerationQueue { sender }, receiver)
}

impl ModerationQueue {
    /// Reserve a slot for one comment id, waiting while the queue is full.
    ///
    /// Reserve before writing the comment: if the caller is cancelled while
    /// waiting, nothing has been stored yet.
    pub async fn reserve(&self) -> Result<QueueSlot<'_>> {
        let permit = self
            .sender
            .reserve()
            .await
            .map_err(|_| CommentsError::QueueClosed)?;
        Ok(QueueSlot { permit })
    }
}

/// A reserved queue slot. Dropping it unused releases the slot.
pub struct QueueSlot<'a> {
    permit: mpsc::Permit<'a, i64>,
}

impl QueueSlot<'_> {
    /// Hand the comment id to the worker. Never waits.
    pub fn send(self, comment_id: i64) {
        self.permit.send(comment_id);
    }
}
