//! Policy checker service
//!
//! `POST /censor` answers 200 for acceptable text and 400 `Inappropriate content`
//! when the text contains a banned term.

pub mod config;
pub mod error;
pub mod handlers;

use actix_web::web;
use content_policy::BannedTerms;
use error::CensorError;

/// Register routes and shared state
pub fn configure(terms: BannedTerms) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(terms))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                CensorError::InvalidBody(err.to_string()).into()
            }))
            .service(
                web::resource("/censor")
                    .route(web::post().to(handlers::censor))
                    .default_service(web::to(handlers::method_not_allowed)),
            )
            .route("/health", web::get().to(handlers::health))
            .route(
                "/metrics",
                web::get().to(actix_middleware::metrics_handler),
            );
    }
}
