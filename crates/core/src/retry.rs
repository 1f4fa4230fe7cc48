// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit retry combinator
//!
//! `retry(policy, jitter, deadline, should_retry, operation)` reruns
//! `operation` until it succeeds, fails with an error the predicate rejects,
//! runs out of attempts, or would have to sleep past the deadline.

use crate::backoff::{AttemptContext, JitterSource, RetryPolicy};
use std::future::Future;
use thiserror::Error;
use tokio::time::Instant;

/// Why a retried operation gave up
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The predicate classified the error as not worth retrying
    #[error("attempt {attempt} failed: {error}")]
    Aborted { attempt: u32, error: E },
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    #[error("deadline reached after {attempts} attempts: {last}")]
    DeadlineExceeded { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Aborted { attempt, .. } => *attempt,
            RetryError::Exhausted { attempts, .. } | RetryError::DeadlineExceeded { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            RetryError::Aborted { error, .. } => error,
            RetryError::Exhausted { last, .. } | RetryError::DeadlineExceeded { last, .. } => last,
        }
    }
}

pub async fn retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    jitter: &dyn JitterSource,
    deadline: Option<Instant>,
    should_retry: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(AttemptContext) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match operation(policy.context(attempt)).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !should_retry(&error) {
            return Err(RetryError::Aborted { attempt, error });
        }
        if attempt >= max_attempts {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: error,
            });
        }

        let delay = policy.sleep_after(attempt, jitter);
        if deadline.is_some_and(|deadline| Instant::now() + delay > deadline) {
            return Err(RetryError::DeadlineExceeded {
                attempts: attempt,
                last: error,
            });
        }

        tracing::debug!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            "retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
