//! # Actix Middleware Library
//!
//! Shared middleware components for the newsroom Actix services
//!
//! ## Modules
//! - `correlation_id`: per-request correlation context and `request_id` propagation
//! - `logging`: structured request completion logs
//! - `metrics`: Prometheus metrics middleware and scrape handler

pub mod correlation_id;
pub mod logging;
pub mod metrics;

pub use correlation_id::{
    correlation_context, generate_request_id, CorrelationContext, CorrelationIdMiddleware,
    REQUEST_ID_HEADER, REQUEST_ID_PARAM,
};
pub use logging::Logging;
pub use metrics::{metrics_handler, MetricsMiddleware};
