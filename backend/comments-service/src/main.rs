use actix_middleware::{CorrelationIdMiddleware, Logging, MetricsMiddleware};
use actix_web::{App, HttpServer};
use anyhow::Context;
use comments_service::config::Config;
use comments_service::db::{CommentStore, MemoryCommentStore, PgCommentStore};
use comments_service::handlers::AppState;
use comments_service::moderation::{moderation_queue, ModerationWorker};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

/// Upper bound on draining the moderation queue at shutdown
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,comments_service=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let store: Arc<dyn CommentStore> = match &config.database.url {
        Some(url) => {
            let store = PgCommentStore::connect(url, config.database.max_connections)
                .await
                .context("Failed to connect to database")?;
            store.migrate().await.context("Failed to run migrations")?;
            info!("Using PostgreSQL comment store");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory comment store");
            Arc::new(MemoryCommentStore::new())
        }
    };

    let (queue, receiver) = moderation_queue(config.moderation.queue_capacity);
    let worker = ModerationWorker::new(
        store.clone(),
        Arc::new(config.moderation.banned_terms.clone()),
        config.moderation.retry(),
    )
    .spawn(receiver);

    info!(
        capacity = config.moderation.queue_capacity,
        "Moderation worker spawned"
    );

    let state = AppState { store, queue };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Comments service starting on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logging)
            .wrap(MetricsMiddleware)
            .wrap(CorrelationIdMiddleware)
            .configure(comments_service::configure(state.clone()))
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    // The server owned every queue sender; the worker drains what is left and exits
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(_) => info!("Moderation worker drained"),
        Err(_) => warn!("Moderation worker did not drain in time, pending comments remain"),
    }

    Ok(())
}
