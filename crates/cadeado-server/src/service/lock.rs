//! Lock backend selection
//!
//! Builds lock handles against the shared contract so the backend stays a
//! deployment decision, never a code-path decision in the callers.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cadeado_common::CadeadoError;
use cadeado_lock::{DistributedLock, LockConfig, TimestampTakeoverLock, TokenLeaseLock};
use cadeado_session::SessionMutexService;
use cadeado_store::CoordinationStore;

/// Which lock implementation a handle is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockBackend {
    /// Opaque token + native store TTL (preferred).
    TokenLease,
    /// Timestamp-encoded token with manual takeover.
    TimestampTakeover,
    /// Consensus-service mutual-exclusion recipe.
    Session,
}

impl FromStr for LockBackend {
    type Err = CadeadoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token-lease" => Ok(LockBackend::TokenLease),
            "timestamp-takeover" => Ok(LockBackend::TimestampTakeover),
            "session" => Ok(LockBackend::Session),
            other => Err(CadeadoError::ConfigError(format!(
                "unknown lock backend '{}'",
                other
            ))),
        }
    }
}

/// Builds `DistributedLock` handles for a configured default backend, with
/// per-call overrides for diagnostics.
pub struct LockFactory {
    store: Arc<dyn CoordinationStore>,
    sessions: Arc<SessionMutexService>,
    default_backend: LockBackend,
    default_config: LockConfig,
}

impl LockFactory {
    pub fn new(
        store: Arc<dyn CoordinationStore>,
        sessions: Arc<SessionMutexService>,
        default_backend: LockBackend,
        default_config: LockConfig,
    ) -> Self {
        Self {
            store,
            sessions,
            default_backend,
            default_config,
        }
    }

    pub fn default_backend(&self) -> LockBackend {
        self.default_backend
    }

    pub fn default_config(&self) -> LockConfig {
        self.default_config
    }

    /// A handle on the configured default backend.
    pub fn create(&self, name: &str) -> Arc<dyn DistributedLock> {
        self.create_with(self.default_backend, name, self.default_config)
    }

    /// A handle on an explicit backend with explicit timing.
    pub fn create_with(
        &self,
        backend: LockBackend,
        name: &str,
        config: LockConfig,
    ) -> Arc<dyn DistributedLock> {
        match backend {
            LockBackend::TokenLease => {
                Arc::new(TokenLeaseLock::new(self.store.clone(), name, config))
            }
            LockBackend::TimestampTakeover => {
                Arc::new(TimestampTakeoverLock::new(self.store.clone(), name, config))
            }
            LockBackend::Session => Arc::new(self.sessions.lock(name, config.acquire_timeout)),
        }
    }
}
