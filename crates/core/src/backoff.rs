// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry pacing shared by the spin-lock and optimistic strategies

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shape of the delay curve between attempts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// `base_delay` every time
    Fixed,
    /// `base_delay × attempt`
    Linear,
    /// `base_delay × multiplier^(attempt - 1)`
    #[default]
    Exponential,
}

/// Bounded retry policy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    pub multiplier: f64,
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    pub kind: BackoffKind,
    /// Spread each sleep over `[delay / 2, delay]` so losers of the same
    /// round do not wake together
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_millis(100), 2.0, Duration::from_millis(500))
            .with_jitter(true)
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            multiplier: 1.0,
            max_delay: delay,
            kind: BackoffKind::Fixed,
            jitter: false,
        }
    }

    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            multiplier: 1.0,
            max_delay: base_delay.saturating_mul(max_attempts.max(1)),
            kind: BackoffKind::Linear,
            jitter: false,
        }
    }

    pub fn exponential(
        max_attempts: u32,
        base_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_attempts,
            base_delay,
            multiplier,
            max_delay,
            kind: BackoffKind::Exponential,
            jitter: false,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sleep after failed attempt `attempt` (1-based), capped at `max_delay`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let raw = match self.kind {
            BackoffKind::Fixed => self.base_delay,
            BackoffKind::Linear => self.base_delay.saturating_mul(attempt),
            BackoffKind::Exponential => {
                let factor = self.multiplier.max(1.0).powi((attempt - 1) as i32);
                let nanos = self.base_delay.as_nanos() as f64 * factor;
                if nanos >= u64::MAX as f64 {
                    Duration::MAX
                } else {
                    Duration::from_nanos(nanos.round() as u64)
                }
            }
        };
        raw.min(self.max_delay)
    }

    /// Actual sleep after attempt `attempt`, placed inside the jitter window
    /// by `source` when jitter is on. Never longer than [`Self::delay_after`].
    pub fn sleep_after(&self, attempt: u32, source: &dyn JitterSource) -> Duration {
        let delay = self.delay_after(attempt);
        if !self.jitter {
            return delay;
        }
        let floor = delay / 2;
        let spread = (delay - floor).mul_f64(source.fraction().clamp(0.0, 1.0));
        floor + spread
    }

    /// Upper bound on total sleep across a fully exhausted run
    pub fn worst_case_total(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.delay_after(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Context for attempt number `attempt`
    pub fn context(&self, attempt: u32) -> AttemptContext {
        AttemptContext {
            attempt_number: attempt,
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            multiplier: self.multiplier,
            max_delay: self.max_delay,
        }
    }
}

/// Per-attempt view of the policy, handed to the operation being retried
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttemptContext {
    pub attempt_number: u32,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl AttemptContext {
    pub fn is_last(&self) -> bool {
        self.attempt_number >= self.max_attempts
    }
}

/// Where a jittered sleep lands inside its window
pub trait JitterSource: Send + Sync {
    /// A value in `[0, 1]`; 0 picks the shortest sleep, 1 the full delay
    fn fraction(&self) -> f64;
}

/// Thread-local RNG jitter
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn fraction(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Replays a fixed list of fractions in order, cycling when exhausted
#[derive(Debug, Default)]
pub struct ScriptedJitter {
    fractions: Vec<f64>,
    next: AtomicUsize,
}

impl ScriptedJitter {
    pub fn new(fractions: impl IntoIterator<Item = f64>) -> Self {
        Self {
            fractions: fractions.into_iter().collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl JitterSource for ScriptedJitter {
    fn fraction(&self) -> f64 {
        if self.fractions.is_empty() {
            return 1.0;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.fractions[index % self.fractions.len()]
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
