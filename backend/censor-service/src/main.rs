use actix_middleware::{CorrelationIdMiddleware, Logging, MetricsMiddleware};
use actix_web::{App, HttpServer};
use anyhow::Context;
use censor_service::config::Config;
use tracing::info;
use tracing_subscriber::prelude::*;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,censor_service=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(terms = config.banned_terms.len(), "Banned term list loaded");

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Censor service starting on http://{}", bind_addr);

    let terms = config.banned_terms;
    HttpServer::new(move || {
        App::new()
            .wrap(Logging)
            .wrap(MetricsMiddleware)
            .wrap(CorrelationIdMiddleware)
            .configure(censor_service::configure(terms.clone()))
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    info!("Censor service stopped");
    Ok(())
}
