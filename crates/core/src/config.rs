// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tunables for every strategy, loadable from TOML

use crate::backoff::RetryPolicy;
use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How a lock holder clears its key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseMode {
    /// Single compare-and-delete on the coordination store
    #[default]
    Atomic,
    /// Read the owner, compare locally, then delete. Leaves a window in which
    /// the key can expire and be re-granted between the read and the delete.
    ReadThenDelete,
}

/// Remote spin-lock settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    pub max_attempts: u32,
    pub release: ReleaseMode,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3),
            poll_interval: Duration::from_millis(50),
            max_attempts: 100,
            release: ReleaseMode::Atomic,
        }
    }
}

impl SpinConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_release(mut self, release: ReleaseMode) -> Self {
        self.release = release;
        self
    }

    /// Longest a caller can spend polling before giving up
    pub fn acquisition_ceiling(&self) -> Duration {
        self.poll_interval.saturating_mul(self.max_attempts)
    }
}

/// Publish/subscribe lock settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PubSubConfig {
    #[serde(with = "humantime_serde")]
    pub wait_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub lease_time: Duration,
    /// Renew the lease in the background while the critical section runs
    pub watchdog: bool,
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(5),
            lease_time: Duration::from_secs(3),
            watchdog: true,
        }
    }
}

impl PubSubConfig {
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn with_lease_time(mut self, lease_time: Duration) -> Self {
        self.lease_time = lease_time;
        self
    }

    pub fn with_watchdog(mut self, watchdog: bool) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Interval at which the watchdog renews a held lease
    pub fn renew_every(&self) -> Duration {
        (self.lease_time / 3).max(Duration::from_millis(1))
    }
}

/// Complete configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub lock_key_prefix: String,
    pub spin: SpinConfig,
    pub pubsub: PubSubConfig,
    /// Pacing for optimistic decreases
    pub optimistic: RetryPolicy,
    /// Pacing for optimistic increases
    pub increase: RetryPolicy,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            lock_key_prefix: "lock:".to_string(),
            spin: SpinConfig::default(),
            pubsub: PubSubConfig::default(),
            optimistic: RetryPolicy::default(),
            increase: RetryPolicy::fixed(5, Duration::from_millis(200)).with_jitter(true),
        }
    }
}

impl GuardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GuardConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spin.max_attempts == 0 {
            return Err(ConfigError::Invalid("spin.max_attempts must be at least 1".into()));
        }
        if self.spin.ttl.is_zero() || self.pubsub.lease_time.is_zero() {
            return Err(ConfigError::Invalid("lock ttl must be positive".into()));
        }
        if self.optimistic.max_attempts == 0 || self.increase.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry max_attempts must be at least 1".into()));
        }
        Ok(())
    }

    pub fn with_spin(mut self, spin: SpinConfig) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_pubsub(mut self, pubsub: PubSubConfig) -> Self {
        self.pubsub = pubsub;
        self
    }

    pub fn with_optimistic(mut self, policy: RetryPolicy) -> Self {
        self.optimistic = policy;
        self
    }

    pub fn with_increase(mut self, policy: RetryPolicy) -> Self {
        self.increase = policy;
        self
    }

    /// Coordination key guarding `id`
    pub fn lock_key(&self, id: &ResourceId) -> String {
        format!("{}{}", self.lock_key_prefix, id)
    }

    /// Channel a pub/sub lock release is announced on
    pub fn release_channel(&self, id: &ResourceId) -> String {
        format!("{}:released", self.lock_key(id))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
