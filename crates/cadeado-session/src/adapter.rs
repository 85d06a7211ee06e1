//! Session lock adapter
//!
//! Adapts a [`MutexRecipe`] to the shared [`DistributedLock`] contract.
//! Failure to acquire and failure due to an underlying error are
//! intentionally not distinguished at this boundary: both come back as
//! "not granted."

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use cadeado_lock::{DistributedLock, ReleaseOutcome};

use crate::recipe::{MutexRecipe, lock_path};

/// Lock handle over a consensus-service mutual-exclusion recipe.
pub struct SessionLock {
    recipe: Arc<dyn MutexRecipe>,
    path: String,
    acquire_timeout: Duration,
    held: Mutex<bool>,
}

impl SessionLock {
    pub fn new(recipe: Arc<dyn MutexRecipe>, name: &str, acquire_timeout: Duration) -> Self {
        Self {
            recipe,
            path: lock_path(name),
            acquire_timeout,
            held: Mutex::new(false),
        }
    }

    /// The hierarchical path this lock lives under.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl DistributedLock for SessionLock {
    async fn acquire(&self) -> anyhow::Result<bool> {
        let mut held = self.held.lock().await;
        if *held {
            return Ok(false);
        }

        match self.recipe.acquire(self.acquire_timeout).await {
            Ok(granted) => {
                *held = granted;
                if granted {
                    debug!(path = %self.path, "Lock acquired");
                }
                Ok(granted)
            }
            Err(e) => {
                warn!(path = %self.path, error = %e, "recipe acquire failed");
                Ok(false)
            }
        }
    }

    async fn release(&self) -> anyhow::Result<ReleaseOutcome> {
        let mut held = self.held.lock().await;
        let was_held = *held;
        *held = false;

        // Always attempted, even when this handle never acquired: the
        // recipe is expected to treat that as a no-op, and errors stay
        // best-effort here.
        if let Err(e) = self.recipe.release().await {
            warn!(path = %self.path, error = %e, "recipe release failed");
        } else if was_held {
            debug!(path = %self.path, "Lock released");
        }

        Ok(if was_held {
            ReleaseOutcome::Released
        } else {
            ReleaseOutcome::NotHeld
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recipe whose every call fails, mimicking a lost session.
    struct LostSessionRecipe;

    #[async_trait]
    impl MutexRecipe for LostSessionRecipe {
        async fn acquire(&self, _wait: Duration) -> anyhow::Result<bool> {
            anyhow::bail!("session expired")
        }

        async fn release(&self) -> anyhow::Result<()> {
            anyhow::bail!("session expired")
        }
    }

    #[tokio::test]
    async fn test_recipe_errors_become_not_granted() {
        let lock = SessionLock::new(
            Arc::new(LostSessionRecipe),
            "res",
            Duration::from_millis(50),
        );

        assert!(!lock.acquire().await.unwrap());
        // Release is attempted and its failure swallowed
        assert_eq!(lock.release().await.unwrap(), ReleaseOutcome::NotHeld);
    }

    #[test]
    fn test_path_is_namespaced() {
        let lock = SessionLock::new(
            Arc::new(LostSessionRecipe),
            "orders",
            Duration::from_millis(50),
        );
        assert_eq!(lock.path(), "/lockPath/orders");
    }
}
