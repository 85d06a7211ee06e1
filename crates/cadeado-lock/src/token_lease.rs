//! Token-lease lock strategy
//!
//! The preferred strategy when the store supports native expiry: the record
//! value is an opaque per-acquisition token, the store's TTL retires stale
//! records by itself, and release proves ownership with a single atomic
//! compare-and-delete.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use cadeado_common::LOCK_KEY_SUFFIX;
use cadeado_store::CoordinationStore;

use crate::contract::DistributedLock;
use crate::model::{LockConfig, ReleaseOutcome};

#[derive(Default)]
struct HolderState {
    held: bool,
    token: Option<String>,
}

/// Distributed lock backed by `set_if_absent` with a native TTL and an
/// opaque uuid token proving ownership on release.
///
/// At most one valid record exists per key at any instant: creation and
/// expiry are both atomic primitives of the store itself.
pub struct TokenLeaseLock {
    store: Arc<dyn CoordinationStore>,
    lock_key: String,
    config: LockConfig,
    state: Mutex<HolderState>,
}

impl TokenLeaseLock {
    pub fn new(store: Arc<dyn CoordinationStore>, name: &str, config: LockConfig) -> Self {
        Self {
            store,
            lock_key: format!("{}{}", name, LOCK_KEY_SUFFIX),
            config,
            state: Mutex::new(HolderState::default()),
        }
    }

    /// The namespaced key this handle writes its record under.
    pub fn lock_key(&self) -> &str {
        &self.lock_key
    }
}

#[async_trait]
impl DistributedLock for TokenLeaseLock {
    async fn acquire(&self) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        if state.held {
            return Ok(false);
        }

        let token = Uuid::new_v4().to_string();
        let deadline = Instant::now() + self.config.acquire_timeout;

        loop {
            let created = match self
                .store
                .set_if_absent(&self.lock_key, &token, Some(self.config.lease))
                .await
            {
                Ok(created) => created,
                Err(e) => {
                    // Treated as contention so the loop keeps retrying;
                    // this conflates transient store failure with a busy
                    // lock, which callers must be aware of.
                    warn!(key = %self.lock_key, error = %e, "setIfAbsent failed during acquire");
                    false
                }
            };

            if created {
                state.held = true;
                state.token = Some(token);
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
        let mut state = self.state.lock().await;
        if !state.held {
            return Ok(ReleaseOutcome::NotHeld);
        }

        state.held = false;
        let Some(token) = state.token.take() else {
            return Ok(ReleaseOutcome::NotHeld);
        };

        if self
            .store
            .compare_and_delete(&self.lock_key, &token)
            .await?
        {
            debug!(key = %self.lock_key, "Lock released");
            Ok(ReleaseOutcome::Released)
        } else {
            warn!(
                key = %self.lock_key,
                "lock record no longer carries this token; the lease expired and the \
                 critical section may have run unprotected"
            );
            Ok(ReleaseOutcome::LostOwnership)
        }
    }
}
