//! Raw key-value endpoints
//!
//! Thin diagnostic access to the coordination store; lock records live
//! under `<name>.lock` keys and are visible here like any other record.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use tracing::error;

use cadeado_common::error::{KEY_NOT_FOUND, SERVER_ERROR};

use crate::model::api::ApiError;
use crate::model::app_state::AppState;

/// GET /v1/kv/{key}
pub async fn get_kv(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let key = path.into_inner();

    match state.store.get(&key).await {
        Ok(Some(value)) => HttpResponse::Ok().content_type("text/plain").body(value),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new(&KEY_NOT_FOUND)),
        Err(e) => {
            error!(key = %key, error = %e, "store get failed");
            HttpResponse::InternalServerError()
                .json(ApiError::with_detail(&SERVER_ERROR, e.to_string()))
        }
    }
}

/// PUT /v1/kv
///
/// Writes every pair of the JSON object body, echoing it back.
pub async fn put_kv(
    state: web::Data<AppState>,
    body: web::Json<HashMap<String, String>>,
) -> HttpResponse {
    let pairs = body.into_inner();

    for (key, value) in &pairs {
        if let Err(e) = state.store.put(key, value).await {
            error!(key = %key, error = %e, "store put failed");
            return HttpResponse::InternalServerError()
                .json(ApiError::with_detail(&SERVER_ERROR, e.to_string()));
        }
    }

    HttpResponse::Ok().json(pairs)
}

/// DELETE /v1/kv/{key}
///
/// Responds with whether a live record existed.
pub async fn delete_kv(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let key = path.into_inner();

    match state.store.delete(&key).await {
        Ok(existed) => HttpResponse::Ok().json(existed),
        Err(e) => {
            error!(key = %key, error = %e, "store delete failed");
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

    use cadeado_lock::LockConfig;
    use cadeado_session::SessionMutexService;
    use cadeado_store::MemoryStore;

    use crate::service::lock::{LockBackend, LockFactory};

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
    async fn test_put_get_delete_round_trip() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(crate::api::routes),
        )
        .await;

        let put = test::TestRequest::put()
            .uri("/v1/kv")
            .set_json(HashMap::from([("k1".to_string(), "v1".to_string())]))
            .to_request();
        assert!(test::call_service(&app, put).await.status().is_success());

        let get = test::TestRequest::get().uri("/v1/kv/k1").to_request();
        let body = test::call_and_read_body(&app, get).await;
        assert_eq!(body, "v1".as_bytes());

        let delete = test::TestRequest::delete().uri("/v1/kv/k1").to_request();
        let deleted: bool = test::call_and_read_body_json(&app, delete).await;
        assert!(deleted);

        let get = test::TestRequest::get().uri("/v1/kv/k1").to_request();
        assert_eq!(test::call_service(&app, get).await.status(), 404);
    }
}
