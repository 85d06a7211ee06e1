//! Main entry point for the Cadeado lock server.
//!
//! Sets up configuration, logging, the coordination store, the lock
//! factory, and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use cadeado_lock::LockConfig;
use cadeado_server::service::lock::{LockBackend, LockFactory};
use cadeado_server::{AppState, Configuration, api, startup};
use cadeado_session::SessionMutexService;
use cadeado_store::{CoordinationStore, MemoryStore};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new();
    let _logging_guard = startup::init_logging(configuration.logs_path().as_deref())?;

    let backend = configuration
        .lock_backend()
        .parse::<LockBackend>()
        .unwrap_or_else(|e| {
            warn!("{}; falling back to token-lease", e);
            LockBackend::TokenLease
        });

    let lock_config = LockConfig::new(
        Duration::from_millis(configuration.lock_lease_ms()),
        Duration::from_millis(configuration.lock_acquire_timeout_ms()),
    )
    .with_poll_interval(Duration::from_millis(configuration.lock_poll_interval_ms()));

    let store: Arc<dyn CoordinationStore> =
        Arc::new(MemoryStore::new().with_expiry_scanner(Duration::from_millis(
            configuration.store_expiry_scan_interval_ms(),
        )));
    let sessions = Arc::new(SessionMutexService::new());
    let lock_factory = Arc::new(LockFactory::new(
        store.clone(),
        sessions,
        backend,
        lock_config,
    ));

    let state = web::Data::new(AppState {
        store,
        lock_factory,
    });

    let address = configuration.server_address();
    let port = configuration.server_port();
    info!(backend = ?backend, "Starting Cadeado server on {}:{}", address, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::routes))
        .bind((address.as_str(), port))?
        .run()
        .await?;

    Ok(())
}
