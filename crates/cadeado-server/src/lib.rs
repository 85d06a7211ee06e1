// Main library module for Cadeado - a distributed lock service over a
// shared coordination store

// Module declarations
pub mod api; // HTTP handlers and routing
pub mod model; // Configuration, application state, API models
pub mod service; // Lock factory and the contention demo
pub mod startup; // Logging bootstrap

pub use model::app_state::AppState;
pub use model::config::Configuration;
pub use service::lock::{LockBackend, LockFactory};
