//! Contention demo endpoint

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::error;

use cadeado_common::error::{PARAMETER_MISSING, PARAMETER_VALIDATE_ERROR, SERVER_ERROR};

use crate::model::api::ApiError;
use crate::model::app_state::AppState;
use crate::service::contention;
use crate::service::lock::LockBackend;

const DEFAULT_WORKERS: usize = 2;
const DEFAULT_TARGET: u64 = 50;
const MAX_WORKERS: usize = 16;
const MAX_TARGET: u64 = 10_000;

#[derive(Debug, Deserialize)]
pub struct ContentionRequest {
    pub key: String,
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub target: Option<u64>,
    #[serde(default)]
    pub backend: Option<LockBackend>,
}

/// POST /v1/demo/contention
pub async fn run_contention(
    state: web::Data<AppState>,
    body: web::Json<ContentionRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    if request.key.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::with_detail(&PARAMETER_MISSING, "key"));
    }

    let workers = request.workers.unwrap_or(DEFAULT_WORKERS);
    let target = request.target.unwrap_or(DEFAULT_TARGET);
    if workers == 0 || workers > MAX_WORKERS || target > MAX_TARGET {
        return HttpResponse::BadRequest().json(ApiError::with_detail(
            &PARAMETER_VALIDATE_ERROR,
            format!(
                "workers must be 1..={} and target at most {}",
                MAX_WORKERS, MAX_TARGET
            ),
        ));
    }

    let factory = state.lock_factory.clone();
    let backend = request.backend.unwrap_or(factory.default_backend());
    let config = factory.default_config();

    match contention::run(factory, backend, config, &request.key, workers, target).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!(key = %request.key, error = %e, "contention run failed");
            HttpResponse::InternalServerError()
                .json(ApiError::with_detail(&SERVER_ERROR, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

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
            LockConfig::new(Duration::from_secs(5), Duration::from_secs(5))
                .with_poll_interval(Duration::from_millis(10)),
        ));
        AppState {
            store,
            lock_factory,
        }
    }

    #[actix_web::test]
    async fn test_contention_endpoint_reports_counts() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(crate::api::routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/v1/demo/contention")
            .set_json(json!({ "key": "demo", "workers": 2, "target": 10 }))
            .to_request();

        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["final_count"], json!(10));
        assert_eq!(response["workers"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_contention_endpoint_bounds_workers() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(crate::api::routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/v1/demo/contention")
            .set_json(json!({ "key": "demo", "workers": 64 }))
            .to_request();

        assert_eq!(test::call_service(&app, request).await.status(), 400);
    }
}
