//! Stale claim sweeper
//!
//! A worker that dies mid-job leaves its row in `started` forever. The
//! sweeper periodically puts such rows back in the queue so another worker
//! picks them up, which makes delivery at-least-once.

use std::time::Duration;

use sqlx::PgPool;
use tokio::time::{MissedTickBehavior, interval};

use crate::service::job_service;

/// Run the sweep loop forever
pub async fn run(pool: PgPool, claim_timeout: Duration, every: Duration) {
    tracing::info!(
        "Requeueing claims older than {:?} every {:?}",
        claim_timeout,
        every
    );

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match job_service::requeue_stale_jobs(&pool, claim_timeout).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Requeued {} stale job(s)", count),
            Err(e) => tracing::error!("Stale claim sweep failed: {:?}", e),
        }
    }
}
