// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::backoff::{RandomJitter, ScriptedJitter};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[derive(Debug, PartialEq, Eq)]
enum Failure {
    Conflict,
    Fatal,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

fn is_conflict(error: &Failure) -> bool {
    *error == Failure::Conflict
}

/// Exponential 100/200ms without jitter, so sleeps are exact
fn lockstep() -> RetryPolicy {
    RetryPolicy::default().with_jitter(false)
}

#[tokio::test(start_paused = true)]
async fn succeeds_once_an_attempt_lands() {
    let calls = AtomicU32::new(0);
    let start = Instant::now();

    let result = retry(&lockstep(), &RandomJitter, None, is_conflict, |ctx| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if ctx.attempt_number < 3 {
                Err(Failure::Conflict)
            } else {
                Ok(ctx.attempt_number)
            }
        }
    })
    .await;

    assert_eq!(result, Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 100ms after the first failure, 200ms after the second
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_reports_attempt_count() {
    let result: Result<(), _> = retry(&lockstep(), &RandomJitter, None, is_conflict, |_| async {
        Err(Failure::Conflict)
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.attempts(), 3);
    assert!(matches!(err, RetryError::Exhausted { last: Failure::Conflict, .. }));
}

#[tokio::test(start_paused = true)]
async fn non_retryable_error_aborts_immediately() {
    let calls = AtomicU32::new(0);
    let result: Result<(), _> = retry(&lockstep(), &RandomJitter, None, is_conflict, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(Failure::Fatal) }
    })
    .await;

    assert_eq!(
        result,
        Err(RetryError::Aborted {
            attempt: 1,
            error: Failure::Fatal
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_stops_before_oversleeping() {
    let start = Instant::now();
    let deadline = start + Duration::from_millis(150);

    let result: Result<(), _> = retry(&lockstep(), &RandomJitter, Some(deadline), is_conflict, |_| async {
        Err(Failure::Conflict)
    })
    .await;

    // first sleep of 100ms fits, the second (200ms) would cross the deadline
    assert!(matches!(result, Err(RetryError::DeadlineExceeded { attempts: 2, .. })));
    assert_eq!(start.elapsed(), Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn linear_policy_waits_base_times_attempt() {
    let start = Instant::now();
    let policy = RetryPolicy::linear(3, Duration::from_millis(100));

    let result: Result<(), _> = retry(&policy, &RandomJitter, None, is_conflict, |_| async { Err(Failure::Conflict) }).await;

    assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3, .. })));
    assert_eq!(start.elapsed(), policy.worst_case_total());
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn jittered_sleeps_land_inside_their_window() {
    let start = Instant::now();
    let jitter = ScriptedJitter::new([0.0, 0.5]);

    let result: Result<(), _> = retry(&RetryPolicy::default(), &jitter, None, is_conflict, |_| async {
        Err(Failure::Conflict)
    })
    .await;

    assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3, .. })));
    // 50ms (floor of 100ms), then 150ms (halfway between 100ms and 200ms)
    assert_eq!(start.elapsed(), Duration::from_millis(200));
    assert!(start.elapsed() <= RetryPolicy::default().worst_case_total());
}

#[tokio::test(start_paused = true)]
async fn jittered_deadline_check_uses_the_actual_sleep() {
    let start = Instant::now();
    let deadline = start + Duration::from_millis(60);
    // the unjittered 100ms would cross the deadline, the jittered 50ms does not
    let jitter = ScriptedJitter::new([0.0, 1.0]);

    let result: Result<(), _> = retry(&RetryPolicy::default(), &jitter, Some(deadline), is_conflict, |_| async {
        Err(Failure::Conflict)
    })
    .await;

    assert!(matches!(result, Err(RetryError::DeadlineExceeded { attempts: 2, .. })));
    assert_eq!(start.elapsed(), Duration::from_millis(50));
}
