// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process coordination store
//!
//! Each key is driven through the [`Lease`] state machine; expiry is judged
//! against the store's clock whenever the key is touched.

use super::{CoordinationError, CoordinationStore, Subscription};
use async_trait::async_trait;
use sg_core::{Clock, Lease, LeaseEvent, LeaseInput, LeaseState, Owner, TokioClock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;
/// Tenures kept for overlap checks before the oldest are dropped
const GRANT_LOG_CAPACITY: usize = 4096;

/// One tenure of a lock key, as seen by the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    pub key: String,
    pub owner: Owner,
    pub granted_at: Instant,
    /// Latest deadline the key was given, extensions included
    pub expires_at: Instant,
    pub released_at: Option<Instant>,
}

impl Grant {
    /// End of the tenure: release or expiry, whichever came first
    pub fn ended_at(&self) -> Instant {
        match self.released_at {
            Some(released) => released.min(self.expires_at),
            None => self.expires_at,
        }
    }

    /// Whether two tenures of the same key were live at the same instant
    pub fn overlaps(&self, other: &Grant) -> bool {
        self.key == other.key
            && self.granted_at < other.ended_at()
            && other.granted_at < self.ended_at()
    }
}

struct State {
    leases: HashMap<String, Lease>,
    channels: HashMap<String, broadcast::Sender<()>>,
    grants: VecDeque<Grant>,
    grant_capacity: usize,
}

impl State {
    fn new(grant_capacity: usize) -> Self {
        Self {
            leases: HashMap::new(),
            channels: HashMap::new(),
            grants: VecDeque::new(),
            grant_capacity,
        }
    }
}

/// Coordination store living in this process
#[derive(Clone)]
pub struct MemoryCoordinationStore<C: Clock = TokioClock> {
    clock: C,
    state: Arc<Mutex<State>>,
}

impl MemoryCoordinationStore<TokioClock> {
    pub fn new() -> Self {
        Self::with_clock(TokioClock)
    }
}

impl Default for MemoryCoordinationStore<TokioClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryCoordinationStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(State::new(GRANT_LOG_CAPACITY))),
        }
    }

    /// Keep at most `capacity` tenures in the grant log
    pub fn with_grant_capacity(self, capacity: usize) -> Self {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .grant_capacity = capacity.max(1);
        self
    }

    /// Recent tenures in grant order, oldest first
    pub fn grants(&self) -> Vec<Grant> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.grants.iter().cloned().collect()
    }

    /// Forget every finished tenure; live ones stay
    pub fn clear_grants(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.grants.retain(|g| g.released_at.is_none());
    }

    /// Release channels that currently have a sender
    pub fn channel_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .channels
            .len()
    }

    /// Live holder of `key`
    pub fn holder(&self, key: &str) -> Option<Owner> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .leases
            .get(key)
            .and_then(|lease| lease.owner(&self.clock).cloned())
    }

    /// Run `input` against `key` and return the events it produced
    fn apply(&self, key: &str, input: LeaseInput) -> Vec<LeaseEvent> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let current = state
            .leases
            .get(key)
            .cloned()
            .unwrap_or_else(|| Lease::new(key));
        let (next, events) = current.transition(input, &self.clock);

        let capacity = state.grant_capacity;
        for event in &events {
            record_grant(&mut state.grants, event, &next, now);
            log_event(event);
        }
        while state.grants.len() > capacity {
            state.grants.pop_front();
        }

        if matches!(next.state, LeaseState::Free) {
            state.leases.remove(key);
        } else {
            state.leases.insert(key.to_string(), next);
        }
        events
    }
}

fn record_grant(grants: &mut VecDeque<Grant>, event: &LeaseEvent, next: &Lease, now: Instant) {
    let deadline = match &next.state {
        LeaseState::Held { expires_at, .. } => Some(*expires_at),
        LeaseState::Free => None,
    };

    match event {
        LeaseEvent::Acquired { key, owner } => grants.push_back(Grant {
            key: key.clone(),
            owner: owner.clone(),
            granted_at: now,
            expires_at: deadline.unwrap_or(now),
            released_at: None,
        }),
        LeaseEvent::Extended { key, owner } => {
            if let (Some(i), Some(deadline)) = (open(grants, key, owner), deadline) {
                grants[i].expires_at = deadline;
            }
        }
        LeaseEvent::Released { key, owner, .. } => {
            if let Some(i) = open(grants, key, owner) {
                grants[i].released_at = Some(now);
            }
        }
        LeaseEvent::Expired { key, owner } => {
            if let Some(i) = open(grants, key, owner) {
                let expired_at = grants[i].expires_at;
                grants[i].released_at = Some(expired_at);
            }
        }
        LeaseEvent::Denied { .. } | LeaseEvent::OwnershipViolation { .. } => {}
    }
}

fn open(grants: &VecDeque<Grant>, key: &str, owner: &Owner) -> Option<usize> {
    grants
        .iter()
        .rposition(|g| g.key == key && &g.owner == owner && g.released_at.is_none())
}

fn log_event(event: &LeaseEvent) {
    match event {
        LeaseEvent::Acquired { key, owner } => tracing::debug!(key = %key, %owner, "lease acquired"),
        LeaseEvent::Denied {
            key,
            owner,
            current_owner,
        } => tracing::trace!(key = %key, %owner, %current_owner, "lease denied"),
        LeaseEvent::Released {
            key,
            owner,
            held_for,
        } => tracing::debug!(
            key = %key,
            %owner,
            held_ms = held_for.as_millis() as u64,
            "lease released"
        ),
        LeaseEvent::Extended { key, owner } => tracing::trace!(key = %key, %owner, "lease extended"),
        LeaseEvent::Expired { key, owner } => tracing::info!(key = %key, %owner, "lease expired"),
        LeaseEvent::OwnershipViolation {
            key,
            owner,
            current_owner,
        } => tracing::debug!(
            key = %key,
            %owner,
            current_owner = ?current_owner.as_ref().map(Owner::as_str),
            "not the current owner"
        ),
    }
}

#[async_trait]
impl<C: Clock> CoordinationStore for MemoryCoordinationStore<C> {
    async fn set_if_absent(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError> {
        let events = self.apply(
            key,
            LeaseInput::Acquire {
                owner: owner.clone(),
                ttl,
            },
        );
        Ok(events
            .iter()
            .any(|e| matches!(e, LeaseEvent::Acquired { .. })))
    }

    async fn get(&self, key: &str) -> Result<Option<Owner>, CoordinationError> {
        self.apply(key, LeaseInput::Tick);
        Ok(self.holder(key))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CoordinationError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .leases
            .get(key)
            .and_then(|lease| lease.remaining(&self.clock)))
    }

    async fn delete(&self, key: &str) -> Result<bool, CoordinationError> {
        match self.holder(key) {
            Some(owner) => self.delete_if_owner(key, &owner).await,
            None => {
                self.apply(key, LeaseInput::Tick);
                Ok(false)
            }
        }
    }

    async fn delete_if_owner(&self, key: &str, owner: &Owner) -> Result<bool, CoordinationError> {
        let events = self.apply(
            key,
            LeaseInput::Release {
                owner: owner.clone(),
            },
        );
        Ok(events
            .iter()
            .any(|e| matches!(e, LeaseEvent::Released { .. })))
    }

    async fn extend_if_owner(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError> {
        let events = self.apply(
            key,
            LeaseInput::Extend {
                owner: owner.clone(),
                ttl,
            },
        );
        Ok(events
            .iter()
            .any(|e| matches!(e, LeaseEvent::Extended { .. })))
    }

    async fn publish(&self, channel: &str) -> Result<usize, CoordinationError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let delivered = state
            .channels
            .get(channel)
            .and_then(|sender| sender.send(()).ok())
            .unwrap_or(0);
        if delivered == 0 {
            state.channels.remove(channel);
        }
        tracing::trace!(channel, delivered, "published");
        Ok(delivered)
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, CoordinationError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.channels.retain(|_, sender| sender.receiver_count() > 0);
        let sender = state
            .channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        Ok(Subscription::new(sender.subscribe()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
