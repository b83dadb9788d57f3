//! Cron loop for the daily aggregation.
//!
//! A single task sleeps until the next scheduled fire in the configured
//! timezone, runs one cycle, and goes back to sleep; consecutive invocations
//! are serialized by construction.

use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::bot::dispatcher::{AppState, WakeBot};

/// Spawn the aggregation schedule.
pub fn spawn(bot: WakeBot, state: AppState, schedule: Schedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = state.clock.now_local();
            let Some(next) = schedule.after(&now).next() else {
                error!("Aggregation schedule has no upcoming fire time, stopping");
                break;
            };

            let wait = (next - now).to_std().unwrap_or_default();
            info!("Next daily aggregation at {}", next);
            tokio::time::sleep(wait).await;

            if let Err(e) = super::run_cycle(&bot, &state).await {
                error!("Daily aggregation cycle failed: {:#}", e);
            }
        }
    })
}
