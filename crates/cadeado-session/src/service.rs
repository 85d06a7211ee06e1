//! In-process mutual-exclusion recipe provider
//!
//! Stands in for the external coordination service: one binary semaphore
//! per path, one session per recipe instance. Sequential fairness comes
//! from the semaphore's FIFO wakeups, mirroring the sequential-node
//! behavior of the real service within a single process.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::debug;
use uuid::Uuid;

use crate::adapter::SessionLock;
use crate::recipe::{MutexRecipe, lock_path};

/// Registry of per-path mutexes.
pub struct SessionMutexService {
    mutexes: Arc<DashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionMutexService {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMutexService {
    pub fn new() -> Self {
        Self {
            mutexes: Arc::new(DashMap::new()),
        }
    }

    /// A fresh session-scoped recipe for `name`.
    pub fn recipe(&self, name: &str) -> Arc<SessionMutex> {
        let path = lock_path(name);
        let semaphore = self
            .mutexes
            .entry(path.clone())
            .or_insert_with(|| Arc::new(Semaphore::new(1)))
            .clone();

        Arc::new(SessionMutex {
            session_id: Uuid::new_v4().to_string(),
            path,
            semaphore,
            permit: Mutex::new(None),
        })
    }

    /// A ready-to-use lock handle for `name`.
    pub fn lock(&self, name: &str, acquire_timeout: Duration) -> SessionLock {
        SessionLock::new(self.recipe(name), name, acquire_timeout)
    }
}

/// One session's view of a path's mutex.
pub struct SessionMutex {
    session_id: String,
    path: String,
    semaphore: Arc<Semaphore>,
    permit: Mutex<Option<OwnedSemaphorePermit>>,
}

impl SessionMutex {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[async_trait]
impl MutexRecipe for SessionMutex {
    async fn acquire(&self, wait: Duration) -> anyhow::Result<bool> {
        let mut permit = self.permit.lock().await;
        if permit.is_some() {
            anyhow::bail!("session {} already holds {}", self.session_id, self.path);
        }

        match tokio::time::timeout(wait, self.semaphore.clone().acquire_owned()).await {
            Ok(Ok(acquired)) => {
                debug!(path = %self.path, session = %self.session_id, "mutex acquired");
                *permit = Some(acquired);
                Ok(true)
            }
            Ok(Err(_)) => anyhow::bail!("mutex for {} is closed", self.path),
            Err(_) => Ok(false),
        }
    }

    async fn release(&self) -> anyhow::Result<()> {
        let mut permit = self.permit.lock().await;
        if permit.take().is_none() {
            // Release without acquire: tolerated as a no-op
            debug!(path = %self.path, session = %self.session_id, "release without held mutex");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cadeado_lock::{DistributedLock, ReleaseOutcome};

    use super::*;

    #[tokio::test]
    async fn test_contention_and_handover() {
        let service = SessionMutexService::new();

        let a = service.lock("res", Duration::from_millis(50));
        let b = service.lock("res", Duration::from_millis(50));

        assert!(a.acquire().await.unwrap());
        assert!(!b.acquire().await.unwrap());

        assert_eq!(a.release().await.unwrap(), ReleaseOutcome::Released);
        assert!(b.acquire().await.unwrap());
        assert_eq!(b.release().await.unwrap(), ReleaseOutcome::Released);
    }

    #[tokio::test]
    async fn test_independent_paths_do_not_contend() {
        let service = SessionMutexService::new();

        let a = service.lock("res-a", Duration::from_millis(50));
        let b = service.lock("res-b", Duration::from_millis(50));

        assert!(a.acquire().await.unwrap());
        assert!(b.acquire().await.unwrap());
    }

    #[tokio::test]
    async fn test_sessions_are_distinct() {
        let service = SessionMutexService::new();
        let first = service.recipe("res");
        let second = service.recipe("res");
        assert_ne!(first.session_id(), second.session_id());
    }

    #[tokio::test]
    async fn test_release_without_acquire_is_noop() {
        let service = SessionMutexService::new();
        let recipe = service.recipe("res");

        recipe.release().await.unwrap();

        // The mutex stays available
        assert!(recipe.acquire(Duration::from_millis(50)).await.unwrap());
    }

    #[tokio::test]
    async fn test_reacquire_within_session_is_an_error() {
        let service = SessionMutexService::new();
        let recipe = service.recipe("res");

        assert!(recipe.acquire(Duration::from_millis(50)).await.unwrap());
        assert!(recipe.acquire(Duration::from_millis(50)).await.is_err());
    }
}
