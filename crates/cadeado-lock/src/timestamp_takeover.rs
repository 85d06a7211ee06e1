//! Timestamp-takeover lock strategy
//!
//! For stores without native expiry (or where it must be emulated): the
//! record value is the lease's absolute expiry instant in epoch millis.
//! A record whose instant lies in the past is stale, and challengers race
//! for it through `get_and_set`; whoever swaps out exactly the stale value
//! they observed wins the takeover.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use cadeado_common::{LOCK_KEY_SUFFIX, epoch_millis};
use cadeado_store::CoordinationStore;

use crate::contract::DistributedLock;
use crate::model::{LockConfig, ReleaseOutcome};

/// Margin added to a candidate expiry so a takeover's lease never starts in
/// the past of the instant that was compared against.
const TAKEOVER_EPSILON_MS: i64 = 1;

/// Distributed lock encoding the lease expiry into the record itself.
///
/// Weaker guarantees than [`crate::TokenLeaseLock`]: a brief overlap window
/// between a lease's logical expiry and the next holder's lease start is
/// tolerated, and `release` deletes unconditionally, so a late releaser can
/// remove a record that a taker legitimately owns by then. Use the
/// token-lease strategy whenever the store supports native expiry.
pub struct TimestampTakeoverLock {
    store: Arc<dyn CoordinationStore>,
    lock_key: String,
    config: LockConfig,
    held: Mutex<bool>,
}

impl TimestampTakeoverLock {
    pub fn new(store: Arc<dyn CoordinationStore>, name: &str, config: LockConfig) -> Self {
        Self {
            store,
            lock_key: format!("{}{}", name, LOCK_KEY_SUFFIX),
            config,
            held: Mutex::new(false),
        }
    }

    /// The namespaced key this handle writes its record under.
    pub fn lock_key(&self) -> &str {
        &self.lock_key
    }

    fn candidate_expiry(&self) -> String {
        (epoch_millis() + self.config.lease.as_millis() as i64 + TAKEOVER_EPSILON_MS).to_string()
    }

    /// One acquisition attempt: create, or take over a stale record.
    async fn try_acquire_once(&self) -> bool {
        let candidate = self.candidate_expiry();

        match self
            .store
            .set_if_absent(&self.lock_key, &candidate, None)
            .await
        {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => {
                warn!(key = %self.lock_key, error = %e, "setIfAbsent failed during acquire");
                return false;
            }
        }

        // Contended: look for a stale record to take over
        let current = match self.store.get(&self.lock_key).await {
            Ok(Some(current)) => current,
            Ok(None) => return false, // released meanwhile; next round creates it
            Err(e) => {
                warn!(key = %self.lock_key, error = %e, "get failed during acquire");
                return false;
            }
        };

        let Ok(current_expiry) = current.parse::<i64>() else {
            debug!(key = %self.lock_key, value = %current, "unparseable lock record, treating as contended");
            return false;
        };

        if current_expiry >= epoch_millis() {
            return false; // lease still running
        }

        match self.store.get_and_set(&self.lock_key, &candidate).await {
            // Swapping out exactly the stale value we observed means no
            // other challenger raced ahead: the takeover is ours.
            Ok(previous) => previous.as_deref() == Some(current.as_str()),
            Err(e) => {
                warn!(key = %self.lock_key, error = %e, "getAndSet failed during takeover");
                false
            }
        }
    }
}

#[async_trait]
impl DistributedLock for TimestampTakeoverLock {
    async fn acquire(&self) -> anyhow::Result<bool> {
        let mut held = self.held.lock().await;
        if *held {
            return Ok(false);
        }

        let deadline = Instant::now() + self.config.acquire_timeout;

        loop {
            if self.try_acquire_once().await {
                *held = true;
                debug!(key = %self.lock_key, "Lock acquired");
                return Ok(true);
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn release(&self) -> anyhow::Result<ReleaseOutcome> {
        let mut held = self.held.lock().await;
        if !*held {
            return Ok(ReleaseOutcome::NotHeld);
        }

        *held = false;

        // Unconditional delete: ownership is not re-proven here, which is
        // the documented weakness of this strategy.
        let existed = self.store.delete(&self.lock_key).await?;
        if !existed {
            debug!(key = %self.lock_key, "no lock record found at release");
        } else {
            debug!(key = %self.lock_key, "Lock released");
        }
        Ok(ReleaseOutcome::Released)
    }
}
