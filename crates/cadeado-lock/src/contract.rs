//! Lock contract shared by every backend

use async_trait::async_trait;

use crate::model::ReleaseOutcome;

/// A mutual-exclusion handle bound to one resource key.
///
/// The store (or the external recipe) is the single source of truth for who
/// holds the lock; the handle's local state only guards its own acquire and
/// release calls. Callers must enter their critical section only after
/// `acquire` returned `Ok(true)`, and must call `release` on every exit
/// path of that section.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Try to take the lock, polling until the configured acquire timeout
    /// elapses.
    ///
    /// `Ok(false)` means the resource stayed busy for the whole window; it
    /// is not an error. Transient backend failures degrade to `Ok(false)`
    /// as well, after being logged.
    async fn acquire(&self) -> anyhow::Result<bool>;

    /// Give the lock back.
    ///
    /// A release without a prior successful `acquire` is a local no-op
    /// reported as [`ReleaseOutcome::NotHeld`]. Backends that can prove
    /// ownership report a takeover of an expired lease as
    /// [`ReleaseOutcome::LostOwnership`] instead of deleting someone else's
    /// record.
    async fn release(&self) -> anyhow::Result<ReleaseOutcome>;
}
