//! Coordination store contract
//!
//! The minimum set of atomic primitives a shared store must expose for the
//! lock engine to work. Implementations are assumed already connected; any
//! transport failure surfaces as an error and is mapped to
//! "operation did not succeed" at the engine boundary.

use std::time::Duration;

use async_trait::async_trait;

/// Atomic key-value primitives against a shared coordination store.
///
/// A record past its native TTL must behave as absent for every operation.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Current value for `key`, or `None` if absent.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Unconditional write with no expiry.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Unconditional delete. Returns whether a live record existed.
    async fn delete(&self, key: &str) -> anyhow::Result<bool>;

    /// Atomically create `key=value` only if `key` is absent, with an
    /// optional native expiry. Returns whether the record was created.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> anyhow::Result<bool>;

    /// Atomically swap the value at `key`, returning the previous value.
    /// The written value carries no expiry.
    async fn get_and_set(&self, key: &str, value: &str) -> anyhow::Result<Option<String>>;

    /// Atomically delete `key` only if its current value equals `expected`,
    /// evaluated as a single indivisible step. Returns whether the record
    /// was deleted.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> anyhow::Result<bool>;
}
