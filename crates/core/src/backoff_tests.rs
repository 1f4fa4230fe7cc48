// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[parameterized(
    first = { 1, 100 },
    second = { 2, 200 },
    third = { 3, 400 },
    capped = { 4, 500 },
    far_out = { 40, 500 },
)]
fn exponential_doubles_up_to_cap(attempt: u32, expected_ms: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_after(attempt), ms(expected_ms));
}

#[parameterized(
    first = { 1, 100 },
    second = { 2, 200 },
    third = { 3, 300 },
)]
fn linear_scales_with_attempt(attempt: u32, expected_ms: u64) {
    let policy = RetryPolicy::linear(3, ms(100));
    assert_eq!(policy.delay_after(attempt), ms(expected_ms));
}

#[test]
fn fixed_never_changes() {
    let policy = RetryPolicy::fixed(5, ms(200));
    assert!((1..=5).all(|n| policy.delay_after(n) == ms(200)));
    assert_eq!(policy.worst_case_total(), ms(800));
}

#[test]
fn worst_case_sums_delays_between_attempts() {
    // three attempts sleep twice: 100 + 200
    assert_eq!(RetryPolicy::default().worst_case_total(), ms(300));
    assert_eq!(RetryPolicy::fixed(1, ms(50)).worst_case_total(), Duration::ZERO);
}

#[test]
fn context_marks_last_attempt() {
    let policy = RetryPolicy::default();
    assert!(!policy.context(2).is_last());
    assert!(policy.context(3).is_last());
    assert_eq!(policy.context(1).max_delay, ms(500));
}

#[test]
fn policy_parses_humantime_durations() {
    let policy: RetryPolicy = toml::from_str(
        r#"
        max_attempts = 4
        base_delay = "50ms"
        kind = "linear"
        "#,
    )
    .unwrap();
    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.base_delay, ms(50));
    assert_eq!(policy.kind, BackoffKind::Linear);
    // unspecified fields fall back to the defaults
    assert_eq!(policy.max_delay, ms(500));
    assert!(policy.jitter);
}

#[test]
fn only_the_default_policy_jitters() {
    assert!(RetryPolicy::default().jitter);
    assert!(!RetryPolicy::fixed(3, ms(10)).jitter);
    assert!(!RetryPolicy::linear(3, ms(10)).jitter);
}

#[parameterized(
    shortest = { 0.0, 1, 50 },
    middle = { 0.5, 1, 75 },
    full = { 1.0, 1, 100 },
    second_attempt_floor = { 0.0, 2, 100 },
    out_of_range_clamps = { 7.0, 2, 200 },
)]
fn jitter_places_sleep_in_upper_half(fraction: f64, attempt: u32, expected_ms: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.sleep_after(attempt, &ScriptedJitter::new([fraction])), ms(expected_ms));
}

#[test]
fn sleep_ignores_source_without_jitter() {
    let policy = RetryPolicy::default().with_jitter(false);
    assert_eq!(policy.sleep_after(1, &ScriptedJitter::new([0.0])), ms(100));
}

#[test]
fn scripted_jitter_cycles() {
    let jitter = ScriptedJitter::new([0.1, 0.9]);
    let drawn: Vec<f64> = (0..4).map(|_| jitter.fraction()).collect();
    assert_eq!(drawn, vec![0.1, 0.9, 0.1, 0.9]);
    assert_eq!(ScriptedJitter::new(Vec::new()).fraction(), 1.0);
}

proptest! {
    #[test]
    fn delay_never_exceeds_cap(
        attempt in 1u32..64,
        base in 1u64..1_000,
        cap in 1u64..5_000,
        multiplier in 1.0f64..4.0,
    ) {
        let policy = RetryPolicy::exponential(8, ms(base), multiplier, ms(cap));
        prop_assert!(policy.delay_after(attempt) <= ms(cap));
        prop_assert!(policy.delay_after(attempt) <= policy.delay_after(attempt + 1));
    }

    #[test]
    fn random_jitter_stays_in_window(attempt in 1u32..8) {
        let policy = RetryPolicy::default();
        let full = policy.delay_after(attempt);
        let slept = policy.sleep_after(attempt, &RandomJitter);
        prop_assert!(slept >= full / 2);
        prop_assert!(slept <= full);
    }
}
