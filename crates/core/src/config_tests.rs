// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::backoff::BackoffKind;

#[test]
fn defaults_match_documented_values() {
    let config = GuardConfig::default();

    assert_eq!(config.spin.ttl, Duration::from_secs(3));
    assert_eq!(config.spin.poll_interval, Duration::from_millis(50));
    assert_eq!(config.spin.max_attempts, 100);
    assert_eq!(config.spin.acquisition_ceiling(), Duration::from_secs(5));
    assert_eq!(config.pubsub.wait_timeout, Duration::from_secs(5));
    assert_eq!(config.pubsub.lease_time, Duration::from_secs(3));
    assert_eq!(config.pubsub.renew_every(), Duration::from_secs(1));
    assert_eq!(config.optimistic.max_attempts, 3);
    assert_eq!(config.increase.kind, BackoffKind::Fixed);
    assert_eq!(config.increase.max_attempts, 5);
    assert!(config.optimistic.jitter);
    assert!(config.increase.jitter);
}

#[test]
fn empty_document_yields_defaults() {
    let config = GuardConfig::from_toml_str("").unwrap();
    assert_eq!(config, GuardConfig::default());
}

#[test]
fn partial_sections_override_only_named_fields() {
    let config = GuardConfig::from_toml_str(
        r#"
        lock_key_prefix = "stock:lock:"

        [spin]
        poll_interval = "10ms"
        release = "read-then-delete"

        [optimistic]
        kind = "linear"
        "#,
    )
    .unwrap();

    assert_eq!(config.spin.poll_interval, Duration::from_millis(10));
    assert_eq!(config.spin.ttl, Duration::from_secs(3));
    assert_eq!(config.spin.release, ReleaseMode::ReadThenDelete);
    assert_eq!(config.optimistic.kind, BackoffKind::Linear);
    assert_eq!(config.lock_key(&ResourceId::from(7u64)), "stock:lock:7");
}

#[test]
fn lock_keys_are_per_resource() {
    let config = GuardConfig::default();
    let a = ResourceId::from("a");
    assert_eq!(config.lock_key(&a), "lock:a");
    assert_eq!(config.release_channel(&a), "lock:a:released");
    assert_ne!(config.lock_key(&a), config.lock_key(&ResourceId::from("b")));
}

#[test]
fn zero_attempts_are_rejected() {
    let err = GuardConfig::from_toml_str("[spin]\nmax_attempts = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_durations_fail_to_parse() {
    let err = GuardConfig::from_toml_str("[spin]\nttl = \"soon\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockguard.toml");
    std::fs::write(&path, "[pubsub]\nwatchdog = false\n").unwrap();

    let config = GuardConfig::load(&path).unwrap();
    assert!(!config.pubsub.watchdog);

    let missing = GuardConfig::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}

#[test]
fn rendered_config_round_trips() {
    let config = GuardConfig::default().with_spin(SpinConfig::default().with_max_attempts(7));
    let text = config.to_toml_string().unwrap();
    assert_eq!(GuardConfig::from_toml_str(&text).unwrap(), config);
}
