// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease state machine for a single lock key
//!
//! Models the value stored under `lock:{id}`: free, or held by one owner until
//! a deadline. Expiry is evaluated lazily against the clock on every input,
//! the way a TTL'd key simply stops existing once its time is up.

use crate::clock::Clock;
use crate::owner::Owner;
use std::time::{Duration, Instant};

/// Current occupancy of a lock key
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaseState {
    Free,
    Held {
        owner: Owner,
        acquired_at: Instant,
        expires_at: Instant,
    },
}

/// Inputs that drive lease transitions
#[derive(Clone, Debug)]
pub enum LeaseInput {
    /// Set-if-absent with a time to live
    Acquire { owner: Owner, ttl: Duration },
    /// Clear the key if `owner` still holds it
    Release { owner: Owner },
    /// Push the deadline out if `owner` still holds it
    Extend { owner: Owner, ttl: Duration },
    /// Sweep an expired holder
    Tick,
}

/// Observable outcomes of a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaseEvent {
    Acquired {
        key: String,
        owner: Owner,
    },
    Denied {
        key: String,
        owner: Owner,
        current_owner: Owner,
    },
    Released {
        key: String,
        owner: Owner,
        held_for: Duration,
    },
    Extended {
        key: String,
        owner: Owner,
    },
    /// The previous holder's time ran out
    Expired {
        key: String,
        owner: Owner,
    },
    /// Release or extend by someone who no longer holds the key
    OwnershipViolation {
        key: String,
        owner: Owner,
        current_owner: Option<Owner>,
    },
}

/// A TTL-bound exclusive lease on one key
#[derive(Clone, Debug)]
pub struct Lease {
    pub key: String,
    pub state: LeaseState,
}

impl Lease {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: LeaseState::Free,
        }
    }

    /// Whether nobody holds a live lease right now
    pub fn is_free(&self, clock: &impl Clock) -> bool {
        self.owner(clock).is_none()
    }

    pub fn is_held_by(&self, owner: &Owner, clock: &impl Clock) -> bool {
        self.owner(clock) == Some(owner)
    }

    /// The live holder, ignoring one whose time has run out
    pub fn owner(&self, clock: &impl Clock) -> Option<&Owner> {
        match &self.state {
            LeaseState::Held {
                owner, expires_at, ..
            } if *expires_at > clock.now() => Some(owner),
            _ => None,
        }
    }

    /// Time left on the live lease
    pub fn remaining(&self, clock: &impl Clock) -> Option<Duration> {
        match &self.state {
            LeaseState::Held { expires_at, .. } => {
                let now = clock.now();
                (*expires_at > now).then(|| expires_at.duration_since(now))
            }
            LeaseState::Free => None,
        }
    }

    /// Pure state transition function
    pub fn transition(&self, input: LeaseInput, clock: &impl Clock) -> (Lease, Vec<LeaseEvent>) {
        let now = clock.now();
        let mut effects = Vec::new();
        let mut next = self.swept(now, &mut effects);

        match input {
            LeaseInput::Acquire { owner, ttl } => match &next.state {
                LeaseState::Free => {
                    next.state = LeaseState::Held {
                        owner: owner.clone(),
                        acquired_at: now,
                        expires_at: now + ttl,
                    };
                    effects.push(LeaseEvent::Acquired {
                        key: self.key.clone(),
                        owner,
                    });
                }
                LeaseState::Held { owner: current, .. } => {
                    // Not reentrant: a second acquire by the same owner is denied too
                    effects.push(LeaseEvent::Denied {
                        key: self.key.clone(),
                        owner,
                        current_owner: current.clone(),
                    });
                }
            },

            LeaseInput::Release { owner } => match &next.state {
                LeaseState::Held {
                    owner: current,
                    acquired_at,
                    ..
                } if *current == owner => {
                    let held_for = now.duration_since(*acquired_at);
                    next.state = LeaseState::Free;
                    effects.push(LeaseEvent::Released {
                        key: self.key.clone(),
                        owner,
                        held_for,
                    });
                }
                state => {
                    effects.push(LeaseEvent::OwnershipViolation {
                        key: self.key.clone(),
                        owner,
                        current_owner: holder_of(state),
                    });
                }
            },

            LeaseInput::Extend { owner, ttl } => match &mut next.state {
                LeaseState::Held {
                    owner: current,
                    expires_at,
                    ..
                } if *current == owner => {
                    *expires_at = now + ttl;
                    effects.push(LeaseEvent::Extended {
                        key: self.key.clone(),
                        owner,
                    });
                }
                state => {
                    let current_owner = holder_of(state);
                    effects.push(LeaseEvent::OwnershipViolation {
                        key: self.key.clone(),
                        owner,
                        current_owner,
                    });
                }
            },

            LeaseInput::Tick => {}
        }

        (next, effects)
    }

    /// Copy of this lease with an expired holder cleared
    fn swept(&self, now: Instant, effects: &mut Vec<LeaseEvent>) -> Lease {
        match &self.state {
            LeaseState::Held {
                owner, expires_at, ..
            } if *expires_at <= now => {
                effects.push(LeaseEvent::Expired {
                    key: self.key.clone(),
                    owner: owner.clone(),
                });
                Lease::new(self.key.clone())
            }
            _ => self.clone(),
        }
    }
}

fn holder_of(state: &LeaseState) -> Option<Owner> {
    match state {
        LeaseState::Held { owner, .. } => Some(owner.clone()),
        LeaseState::Free => None,
    }
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
