//! HTTP handlers and routing

pub mod demo;
pub mod kv;
pub mod lock;

use actix_web::web;

/// Wire every endpoint under the `/v1` scope.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/kv", web::put().to(kv::put_kv))
            .route("/kv/{key}", web::get().to(kv::get_kv))
            .route("/kv/{key}", web::delete().to(kv::delete_kv))
            .route("/lock/try", web::post().to(lock::try_lock))
            .route("/demo/contention", web::post().to(demo::run_contention)),
    );
}
