use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ghreview_orchestrator::config::Config;
use ghreview_orchestrator::{api, db, sweeper};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghreview_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ghreview Orchestrator...");

    let config = Config::from_env();
    config.validate()?;

    if config.allow_anonymous {
        tracing::warn!("Anonymous submissions are allowed");
    }

    tracing::info!("Connecting to database...");

    // Create database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Database connection pool created");

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Return stale claims to the queue in the background
    tokio::spawn(sweeper::run(
        pool.clone(),
        config.claim_timeout,
        config.requeue_interval,
    ));

    // Build router with all API endpoints
    let app = api::create_router(api::AppState::new(pool, config.allow_anonymous));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
