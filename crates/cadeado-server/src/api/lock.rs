//! Diagnostic lock endpoint
//!
//! One full acquire/release cycle per request, mirroring how a worker
//! would probe the lock. The release outcome is part of the response so a
//! lost lease is visible instead of silently swallowed.

use std::time::Duration;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::error;

use cadeado_common::error::{PARAMETER_MISSING, SERVER_ERROR};
use cadeado_lock::ReleaseOutcome;

use crate::model::api::ApiError;
use crate::model::app_state::AppState;
use crate::service::lock::LockBackend;

#[derive(Debug, Deserialize)]
pub struct TryLockRequest {
    pub key: String,
    #[serde(default)]
    pub lease_ms: Option<u64>,
    #[serde(default)]
    pub wait_ms: Option<u64>,
    #[serde(default)]
    pub backend: Option<LockBackend>,
}

#[derive(Debug, Serialize)]
pub struct TryLockResponse {
    pub acquired: bool,
    pub release: ReleaseOutcome,
}

/// POST /v1/lock/try
pub async fn try_lock(
    state: web::Data<AppState>,
    body: web::Json<TryLockRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    if request.key.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::with_detail(&PARAMETER_MISSING, "key"));
    }

    let factory = &state.lock_factory;
    let mut config = factory.default_config();
    if let Some(ms) = request.lease_ms {
        config.lease = Duration::from_millis(ms);
    }
    if let Some(ms) = request.wait_ms {
        config.acquire_timeout = Duration::from_millis(ms);
    }
    let backend = request.backend.unwrap_or(factory.default_backend());

    let lock = factory.create_with(backend, &request.key, config);

    let acquired = match lock.acquire().await {
        Ok(acquired) => acquired,
        Err(e) => {
            error!(key = %request.key, error = %e, "lock acquire failed");
            return HttpResponse::InternalServerError()
                .json(ApiError::with_detail(&SERVER_ERROR, e.to_string()));
        }
    };

    // Release unconditionally, as the probe's critical section is empty;
    // when nothing was acquired this is a local no-op.
    let release = match lock.release().await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(key = %request.key, error = %e, "lock release failed");
            return HttpResponse::InternalServerError()
                .json(ApiError::with_detail(&SERVER_ERROR, e.to_string()));
        }
    };

    HttpResponse::Ok().json(TryLockResponse { acquired, release })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use serde_json::json;

    use cadeado_lock::LockConfig;
    use cadeado_session::SessionMutexService;
    use cadeado_store::MemoryStore;

    use crate::service::lock::LockFactory;

    use super::*;

    fn test_state() -> AppState {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let lock_factory = Arc::new(LockFactory::new(
            store.clone(),
            Arc::new(SessionMutexService::new()),
            LockBackend::TokenLease,
            LockConfig::new(Duration::from_millis(500), Duration::from_millis(100)),
        ));
        AppState {
            store,
            lock_factory,
        }
    }

    #[actix_web::test]
    async fn test_try_lock_cycle() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(crate::api::routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/v1/lock/try")
            .set_json(json!({ "key": "res1", "lease_ms": 500, "wait_ms": 100 }))
            .to_request();

        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["acquired"], json!(true));
        assert_eq!(response["release"], json!("released"));
    }

    #[actix_web::test]
    async fn test_try_lock_requires_key() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(crate::api::routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/v1/lock/try")
            .set_json(json!({ "key": "" }))
            .to_request();

        assert_eq!(test::call_service(&app, request).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_try_lock_on_busy_key() {
        let state = test_state();
        let holder = state.lock_factory.create("res1");
        assert!(holder.acquire().await.unwrap());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::api::routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/v1/lock/try")
            .set_json(json!({ "key": "res1", "wait_ms": 50 }))
            .to_request();

        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["acquired"], json!(false));
        assert_eq!(response["release"], json!("not_held"));
    }
}
