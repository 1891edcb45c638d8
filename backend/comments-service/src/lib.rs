//! Comments service
//!
//! Stores reader comments and publishes them only after the moderation worker
//! has approved the persisted text.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod moderation;

use actix_web::web;
use error::CommentsError;
use handlers::AppState;

/// Register routes and shared state
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                CommentsError::Validation(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                CommentsError::Validation(err.to_string()).into()
            }))
            .service(
                web::resource("/comments")
                    .route(web::post().to(handlers::create_comment))
                    .route(web::get().to(handlers::list_comments)),
            )
            .route("/health", web::get().to(handlers::health))
            .route(
                "/metrics",
                web::get().to(actix_middleware::metrics_handler),
            );
    }
}
