/// Resilience patterns for calls between newsroom services
///
/// - **Deadline**: a point in time shared by every downstream call made on behalf of one
///   inbound request
/// - **Retry**: exponential backoff with jitter for transient store failures
///
/// # Example: fan-out under one deadline
///
/// ```rust,no_run
/// use resilience::Deadline;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let deadline = Deadline::after(Duration::from_secs(3));
///
///     // Both branches stop at the same instant
///     let (news, comments) = tokio::join!(
///         deadline.run(async { "news" }),
///         deadline.run(async { "comments" }),
///     );
///     assert_eq!(news.unwrap(), "news");
///     assert_eq!(comments.unwrap(), "comments");
/// }
/// ```

pub mod retry;
pub mod timeout;

pub use retry::{with_retry, RetryConfig, RetryError};
pub use timeout::{with_timeout, Deadline, TimeoutError};
