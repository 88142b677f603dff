//! HTTP route modules

pub mod batch;
pub mod health;
pub mod metrics;
pub mod rpc;

use crate::core::rpc::RPC_BATCH_PATH;
use crate::server::middleware::TrustedSubnet;
use crate::utils::net::IpNet;
use actix_web::web;

/// Configure every route of the main listener
pub fn configure_routes(cfg: &mut web::ServiceConfig, trusted: Option<IpNet>) {
    cfg.route("/", web::get().to(metrics::index))
        .route("/ping", web::get().to(health::ping))
        .route("/health", web::get().to(health::ping))
        .route("/value/", web::post().to(metrics::value_json))
        .route("/value/{type}/{name}", web::get().to(metrics::value_path))
        .route("/update/", web::post().to(metrics::update_json))
        .route(
            "/update/{type}/{name}/{value}",
            web::post().to(metrics::update_path),
        )
        .route("/update/{type}/", web::post().to(metrics::missing_name))
        .route("/update/{type}", web::post().to(metrics::missing_name))
        .service(
            web::resource("/updates/")
                .wrap(TrustedSubnet::new(trusted))
                .route(web::post().to(batch::update_batch)),
        );
    configure_rpc(cfg, trusted);
}

/// Configure the RPC method, also served alone on the RPC listener
pub fn configure_rpc(cfg: &mut web::ServiceConfig, trusted: Option<IpNet>) {
    cfg.service(
        web::resource(RPC_BATCH_PATH)
            .wrap(TrustedSubnet::new(trusted))
            .route(web::post().to(rpc::batch_update)),
    );
}
