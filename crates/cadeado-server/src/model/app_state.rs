//! Shared application state

use std::sync::Arc;

use cadeado_store::CoordinationStore;

use crate::service::lock::LockFactory;

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CoordinationStore>,
    pub lock_factory: Arc<LockFactory>,
}
