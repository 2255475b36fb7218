use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create assessment jobs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessment_jobs (
            id UUID PRIMARY KEY,
            status VARCHAR(20) NOT NULL,
            request JSONB NOT NULL,
            requested_by TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            started_at TIMESTAMPTZ,
            completed_at TIMESTAMPTZ,
            worker_id TEXT,
            attempts INTEGER NOT NULL DEFAULT 0,
            result JSONB,
            error TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created before identities were unbounded
    sqlx::query(
        "ALTER TABLE assessment_jobs ALTER COLUMN requested_by TYPE TEXT, ALTER COLUMN worker_id TYPE TEXT",
    )
    .execute(pool)
    .await?;

    // Queue scans and the stale-claim sweep both filter on status
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assessment_jobs_status ON assessment_jobs(status, created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assessment_jobs_started_at ON assessment_jobs(started_at) WHERE status = 'started'",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
