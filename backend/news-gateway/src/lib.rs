//! # News Gateway
//!
//! Public HTTP entry point of the newsroom backend.
//!
//! - `GET /news/detail?id=` fans out to the news and comments services and
//!   returns the merged record (all-or-nothing)
//! - `POST /comment/add` runs the fail-closed moderation gate before forwarding
//!   the write to the comments service
//! - `GET /news?s=&page=` passes through to the news service

pub mod aggregator;
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod moderation;

use actix_web::web;
use error::GatewayError;
use handlers::GatewayState;

/// Register gateway routes
pub fn configure(state: web::Data<GatewayState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                GatewayError::Validation(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                GatewayError::Validation(err.to_string()).into()
            }))
            .route("/news/detail", web::get().to(handlers::news_detail))
            .route("/news", web::get().to(handlers::news_list))
            .route("/comment/add", web::post().to(handlers::add_comment))
            .route("/health", web::get().to(handlers::health))
            .route(
                "/metrics",
                web::get().to(actix_middleware::metrics_handler),
            );
    }
}
