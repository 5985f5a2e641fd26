//! Periodic world-rate log lines.
//!
//! Stands in for the presentation layer's status bar when the engine runs
//! headless: every `report_interval_secs` the world rates are logged at
//! `info!` until the session stops.

use std::sync::Arc;
use std::time::Duration;

use contagion_core::session::Session;
use contagion_types::WorldRates;
use tokio::task::JoinHandle;
use tracing::info;

/// Spawn the reporter. The task yields the number of reports written.
pub fn spawn_reporter(session: Arc<Session>, every: Duration) -> JoinHandle<u64> {
    tokio::spawn(run_reporter(session, every))
}

async fn run_reporter(session: Arc<Session>, every: Duration) -> u64 {
    let mut reports: u64 = 0;
    while session.sleep_unless_stopped(every).await {
        let rates = session.world_rates().await;
        log_rates(session.tick(), &rates);
        reports = reports.saturating_add(1);
    }
    reports
}

/// Log one world-rate line.
pub fn log_rates(tick: u64, rates: &WorldRates) {
    info!(
        tick,
        infected = format_args!("{:.2}%", rates.infected),
        dead = format_args!("{:.2}%", rates.dead),
        recovered = format_args!("{:.2}%", rates.recovered),
        healthy = format_args!("{:.2}%", rates.healthy),
        "World rates"
    );
}
