//! Event listeners.

use sdk_smoke_core::HarnessEvent;
use sdk_smoke_retry::{run_with_retry, RetryConfig, RetryEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct TestError(&'static str);

fn failing_until(calls: &AtomicUsize, succeed_on: usize) -> impl std::future::Future<Output = Result<usize, TestError>> {
    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
    async move {
        if n >= succeed_on {
            Ok(n)
        } else {
            Err(TestError("unavailable"))
        }
    }
}

#[tokio::test]
async fn retry_events_carry_failed_attempt_and_delay() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = RetryConfig::builder()
        .max_attempts(3)
        .fixed_backoff(Duration::from_millis(1))
        .on_retry(move |attempt, delay| sink.lock().unwrap().push((attempt, delay)))
        .build();

    let calls = AtomicUsize::new(0);
    let result = run_with_retry(|| failing_until(&calls, 3), &config).await;

    assert_eq!(result, Ok(3));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, Duration::from_millis(1)), (2, Duration::from_millis(1))]
    );
}

#[tokio::test]
async fn success_reports_attempts_used() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&attempts);
    let config = RetryConfig::builder()
        .max_attempts(5)
        .no_delay()
        .on_success(move |n| {
            sink.store(n, Ordering::SeqCst);
        })
        .build();

    let calls = AtomicUsize::new(0);
    run_with_retry(|| failing_until(&calls, 2), &config)
        .await
        .unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn exhaustion_emits_error_once() {
    let errors = Arc::new(AtomicUsize::new(0));
    let attempts = Arc::new(AtomicUsize::new(0));
    let (e, a) = (Arc::clone(&errors), Arc::clone(&attempts));
    let config = RetryConfig::builder()
        .max_attempts(3)
        .no_delay()
        .on_error(move |n| {
            e.fetch_add(1, Ordering::SeqCst);
            a.store(n, Ordering::SeqCst);
        })
        .build();

    let calls = AtomicUsize::new(0);
    let result = run_with_retry(|| failing_until(&calls, 99), &config).await;

    assert_eq!(result, Err(TestError("unavailable")));
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rejected_error_emits_ignored_error() {
    let ignored = Arc::new(AtomicUsize::new(0));
    let retried = Arc::new(AtomicUsize::new(0));
    let (i, r) = (Arc::clone(&ignored), Arc::clone(&retried));
    let config = RetryConfig::builder()
        .max_attempts(3)
        .no_delay()
        .retry_on(|_: &TestError| false)
        .on_ignored_error(move |n| {
            i.store(n, Ordering::SeqCst);
        })
        .on_retry(move |_, _| {
            r.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let calls = AtomicUsize::new(0);
    let result = run_with_retry(|| failing_until(&calls, 99), &config).await;

    assert!(result.is_err());
    assert_eq!(ignored.load(Ordering::SeqCst), 1);
    assert_eq!(retried.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn panicking_listener_does_not_break_the_run() {
    let config = RetryConfig::builder()
        .max_attempts(2)
        .no_delay()
        .on_retry(|_, _| panic!("listener bug"))
        .build();

    let calls = AtomicUsize::new(0);
    let result = run_with_retry(|| failing_until(&calls, 2), &config).await;

    assert_eq!(result, Ok(2));
}

#[test]
fn events_name_their_type_and_source() {
    let event = RetryEvent::Retry {
        retry_name: "offers".into(),
        timestamp: std::time::Instant::now(),
        attempt: 1,
        delay: Duration::ZERO,
    };
    assert_eq!(event.event_type(), "Retry");
    assert_eq!(event.source_name(), "offers");
}
