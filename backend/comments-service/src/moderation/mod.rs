//! Asynchronous post-write moderation
//!
//! `POST /comments` reserves a slot on a bounded [`ModerationQueue`], stores
//! the comment, then queues its id. A single [`ModerationWorker`] drains the
//! queue, re-checks the persisted text and moves the comment to approved or
//! rejected.

pub mod queue;
pub mod worker;

pub use queue::{moderation_queue, ModerationQueue, ModerationReceiver, QueueSlot};
pub use worker::{ModerationOutcome, ModerationWorker};
