//! Lock configuration and result model

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Poll resolution of the acquisition loop
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a holder may keep the lock before it is eligible for takeover
pub const DEFAULT_LEASE: Duration = Duration::from_secs(60);

/// Ceiling on how long `acquire` polls before giving up
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timing knobs for a lock handle.
///
/// Polling is fixed-interval by design: simultaneous waiters converge to
/// retrying in lock-step, an accepted fairness limitation.
#[derive(Debug, Clone, Copy)]
pub struct LockConfig {
    /// Lease duration; bounds how long a holder keeps the lock without
    /// releasing before others may take over.
    pub lease: Duration,
    /// How long `acquire` keeps polling before returning `false`.
    pub acquire_timeout: Duration,
    /// Fixed interval between acquisition attempts.
    pub poll_interval: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            lease: DEFAULT_LEASE,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl LockConfig {
    pub fn new(lease: Duration, acquire_timeout: Duration) -> Self {
        Self {
            lease,
            acquire_timeout,
            ..Default::default()
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// What a `release` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseOutcome {
    /// This holder's record was removed.
    Released,
    /// The handle never held the lock (or already released it); nothing was
    /// sent to the store.
    NotHeld,
    /// The record's token no longer matched: the lease expired and someone
    /// else took over. The caller's critical section may have run
    /// unprotected past the lease.
    LostOwnership,
}

impl ReleaseOutcome {
    pub fn is_released(&self) -> bool {
        matches!(self, ReleaseOutcome::Released)
    }
}
