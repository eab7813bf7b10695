use async_trait::async_trait;
use std::time::Duration;

use super::PeriodicJob;
use crate::api::AppState;

/// Drops in-memory sessions that have been idle longer than the
/// configured TTL.
#[derive(Debug)]
pub struct EvictIdleSessions;

#[async_trait]
impl PeriodicJob for EvictIdleSessions {
    fn interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn run_job(&self, state: &AppState) {
        let evicted = state.sessions.evict_idle(state.config.session_ttl);
        if evicted > 0 {
            tracing::info!(
                "Evicted {} idle sessions, {} remaining",
                evicted,
                state.sessions.len()
            );
        }
    }
}
