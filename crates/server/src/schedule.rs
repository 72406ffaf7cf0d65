use crate::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Regenerate the cache every `every`, starting one period from now.
///
/// Runs until the returned handle is aborted.
pub fn spawn_schedule(state: AppState, every: Duration) -> JoinHandle<()> {
    tracing::info!(every_secs = every.as_secs(), "Scheduling cache regeneration");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            match state.regenerate().await {
                Ok(data) => tracing::info!(count = data.len(), "Scheduled regeneration finished"),
                Err(e) => tracing::error!(error = ?e, "Scheduled regeneration failed"),
            }
        }
    })
}
