//! In-memory coordination store
//!
//! Backs standalone deployments and tests. Atomicity comes from the DashMap
//! entry API: every conditional operation holds the entry's shard lock for
//! the whole check-then-act step.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use metrics::gauge;
use tracing::{debug, info};

use crate::store::CoordinationStore;

/// A stored record with an optional native expiry
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: &str, ttl: Option<Duration>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: ttl.map(|t| Instant::now() + t),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// In-memory coordination store using DashMap.
///
/// Expired records are dropped lazily on access, so correctness never
/// depends on the background scanner.
pub struct MemoryStore {
    entries: Arc<DashMap<String, StoredValue>>,
    _scanner_handle: Option<tokio::task::JoinHandle<()>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            _scanner_handle: None,
        }
    }

    /// Start with a background scanner that drops expired records and
    /// publishes the live-entry gauge.
    pub fn with_expiry_scanner(self, interval: Duration) -> Self {
        let entries = self.entries.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            loop {
                interval.tick().await;
                Self::scan_expired(&entries);
            }
        });

        info!("MemoryStore initialized with background expiry scanner");

        Self {
            entries: self.entries,
            _scanner_handle: Some(handle),
        }
    }

    fn scan_expired(entries: &Arc<DashMap<String, StoredValue>>) {
        let expired_keys: Vec<String> = entries
            .iter()
            .filter(|entry| entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();

        for key in &expired_keys {
            entries.remove_if(key, |_, v| v.is_expired());
        }

        if !expired_keys.is_empty() {
            debug!(count = expired_keys.len(), "Dropped expired store records");
        }

        gauge!("cadeado_store_live_entries").set(entries.len() as f64);
    }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.entries.remove_if(key, |_, v| v.is_expired());
        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .insert(key.to_string(), StoredValue::new(value, None));
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, v)| !v.is_expired()))
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> anyhow::Result<bool> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(StoredValue::new(value, ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::new(value, ttl));
                Ok(true)
            }
        }
    }

    async fn get_and_set(&self, key: &str, value: &str) -> anyhow::Result<Option<String>> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(StoredValue::new(value, None));
                if previous.is_expired() {
                    Ok(None)
                } else {
                    Ok(Some(previous.value))
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::new(value, None));
                Ok(None)
            }
        }
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> anyhow::Result<bool> {
        Ok(self
            .entries
            .remove_if(key, |_, v| !v.is_expired() && v.value == expected)
            .is_some())
    }
}
