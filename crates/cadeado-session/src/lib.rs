//! Cadeado Session - Consensus-service lock adapter
//!
//! Wraps an external sequential mutual-exclusion recipe (the kind a
//! consensus-backed coordination service exposes over a hierarchical
//! namespace) behind the shared lock contract. The recipe's guarantees are
//! session-based rather than lease-based; this crate only specifies its
//! boundary and adapts it.

pub mod adapter;
pub mod recipe;
pub mod service;

pub use adapter::SessionLock;
pub use recipe::{MutexRecipe, lock_path};
pub use service::SessionMutexService;
