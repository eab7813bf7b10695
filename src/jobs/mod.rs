//! Background jobs that run on a fixed interval.

use std::time::Duration;

use async_trait::async_trait;

use crate::api::{AppState, SharedState};

mod evict_idle_sessions;

pub use evict_idle_sessions::EvictIdleSessions;

#[async_trait]
pub trait PeriodicJob: Send + Sync {
    fn interval(&self) -> Duration;
    async fn run_job(&self, state: &AppState);
}

/// Run `job` forever in its own tokio task.
pub fn spawn_periodic_job<J>(state: SharedState, job: J)
where
    J: PeriodicJob + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(job.interval());
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            job.run_job(&state).await;
        }
    });
}
