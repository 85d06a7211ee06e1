//! Boundary of the external mutual-exclusion recipe

use std::time::Duration;

use async_trait::async_trait;

use cadeado_common::LOCK_PATH_PREFIX;

/// Map a resource name into the fixed lock namespace.
pub fn lock_path(name: &str) -> String {
    format!("{}{}", LOCK_PATH_PREFIX, name.trim_start_matches('/'))
}

/// A sequential, session-scoped mutual-exclusion recipe bound to one path.
///
/// This is the contract of an external coordination-service library; the
/// adapter never looks past it. Behavior of `release` without a prior
/// successful `acquire` is implementation-defined, so callers guard that
/// case themselves.
#[async_trait]
pub trait MutexRecipe: Send + Sync {
    /// Try to take the mutex, waiting up to `wait`. `Ok(false)` on timeout.
    async fn acquire(&self, wait: Duration) -> anyhow::Result<bool>;

    /// Give the mutex back.
    async fn release(&self) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path_namespacing() {
        assert_eq!(lock_path("orders"), "/lockPath/orders");
        // Leading slashes collapse into the namespace
        assert_eq!(lock_path("/orders"), "/lockPath/orders");
    }
}
