//! Cadeado Lock - Store-backed distributed lock engine
//!
//! This crate provides:
//! - The lock contract shared by every backend (`DistributedLock`)
//! - The token-lease strategy: opaque token + native store TTL, with an
//!   atomic compare-and-delete release (`TokenLeaseLock`)
//! - The timestamp-takeover strategy: expiry-instant token with a manual
//!   takeover race for stale records (`TimestampTakeoverLock`)
//!
//! The two strategies are deliberately separate types with different
//! guarantees; callers pick one through configuration and then program
//! against the `DistributedLock` trait only.

pub mod contract;
pub mod model;
pub mod timestamp_takeover;
pub mod token_lease;

pub use contract::DistributedLock;
pub use model::{LockConfig, ReleaseOutcome};
pub use timestamp_takeover::TimestampTakeoverLock;
pub use token_lease::TokenLeaseLock;
