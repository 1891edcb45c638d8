/// Deadline propagation for async operations
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// An absolute point in time by which an operation must finish.
///
/// Deadlines are `Copy` so they can be handed to every spawned sub-call of a request.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeoutError {
    #[error("Deadline of {0:?} elapsed")]
    Elapsed(Duration),
}

impl Deadline {
    /// Deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drive `future` until it completes or the deadline passes.
    ///
    /// On expiry the future is dropped, which cancels any work it owns.
    pub async fn run<F, T>(&self, future: F) -> Result<T, TimeoutError>
    where
        F: Future<Output = T>,
    {
        timeout_at(self.at, future)
            .await
            .map_err(|_| TimeoutError::Elapsed(self.budget))
    }
}

/// Execute a future with a relative timeout
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    Deadline::after(duration).run(future).await
}
