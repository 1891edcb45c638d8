use actix_middleware::{CorrelationIdMiddleware, Logging, MetricsMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use news_gateway::clients::ServiceClients;
use news_gateway::config::Config;
use news_gateway::handlers::GatewayState;
use tracing::info;
use tracing_subscriber::prelude::*;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,news_gateway=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        )
        .init();

    info!("Starting news gateway...");

    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        news = %config.services.news_service,
        comments = %config.services.comments_service,
        censor = %config.services.censor_service,
        aggregate_timeout_ms = config.timeouts.aggregate.as_millis() as u64,
        "Downstream services configured"
    );

    let clients = ServiceClients::http(&config.services, &config.timeouts)
        .context("Failed to build HTTP clients")?;
    let state = web::Data::new(GatewayState::new(
        clients,
        config.timeouts.aggregate,
        config.timeouts.policy,
    ));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("News gateway starting on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logging)
            .wrap(MetricsMiddleware)
            .wrap(CorrelationIdMiddleware)
            .configure(news_gateway::configure(state.clone()))
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
