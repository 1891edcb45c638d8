/// Integration tests for resilience library
use resilience::{with_retry, Deadline, RetryConfig, TimeoutError};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ==================== Deadline Tests ====================

#[tokio::test]
async fn test_deadline_cancels_losing_branch() {
    let finished = Arc::new(AtomicBool::new(false));
    let finished_clone = finished.clone();
    let deadline = Deadline::after(Duration::from_millis(30));

    let result = deadline
        .run(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            finished_clone.store(true, Ordering::SeqCst);
        })
        .await;

    assert!(matches!(result, Err(TimeoutError::Elapsed(_))));

    // The dropped future must never resume
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_sibling_calls_share_one_deadline() {
    let deadline = Deadline::after(Duration::from_millis(50));

    let (a, b) = tokio::join!(
        deadline.run(async { 1 }),
        deadline.run(tokio::time::sleep(Duration::from_millis(500)))
    );

    assert_eq!(a, Ok(1));
    assert!(b.is_err());
}

// ==================== Retry + Deadline Tests ====================

#[tokio::test]
async fn test_retry_inside_deadline_stops_at_deadline() {
    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = attempts.clone();

    let config = RetryConfig {
        max_retries: 100,
        initial_backoff: Duration::from_millis(20),
        backoff_multiplier: 1.0,
        jitter: false,
        ..Default::default()
    };

    let result = Deadline::after(Duration::from_millis(100))
        .run(with_retry(&config, "always-failing", move || {
            attempts_clone.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>("unavailable") }
        }))
        .await;

    assert!(result.is_err(), "deadline should win over a long retry budget");
    let made = attempts.load(Ordering::SeqCst);
    assert!(made >= 2 && made < 100, "unexpected attempt count {}", made);
}

#[tokio::test]
async fn test_retry_recovers_within_deadline() {
    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = attempts.clone();

    let config = RetryConfig {
        max_retries: 3,
        initial_backoff: Duration::from_millis(5),
        jitter: false,
        ..Default::default()
    };

    let result = Deadline::after(Duration::from_secs(1))
        .run(with_retry(&config, "recovering", move || {
            let n = attempts_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err("connection reset")
                } else {
                    Ok("row")
                }
            }
        }))
        .await;

    assert_eq!(result.unwrap().unwrap(), "row");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
