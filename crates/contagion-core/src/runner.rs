//! Background tasks that drive a session.
//!
//! Two independent loops run per session:
//!
//! - [`run_clock`] ticks the simulation every `tick_interval_ms`. A failed
//!   tick is logged and the loop carries on with the next one.
//! - [`run_growth`] grants one upgrade point as soon as growth is on and
//!   then one every `growth_interval_secs`, and parks on a notify while it
//!   is off.
//!
//! Both loops end promptly once [`Session::stop`] is called. [`start`]
//! spawns them and returns their handles.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::info;

use crate::clock::{ClockError, SimulationClock};
use crate::config::SimulationConfig;
use crate::integrator::Integrator;
use crate::propagation::{InfectionPropagator, RngSource, SeedingSource};
use crate::session::{Session, SessionError};
use crate::tick::TickContext;

/// Handles of a started session's background tasks.
#[derive(Debug)]
pub struct SessionTasks {
    /// The clock loop; yields the number of ticks attempted.
    pub clock: JoinHandle<u64>,
    /// The growth loop; yields the number of points granted.
    pub growth: JoinHandle<u64>,
}

/// Build the engine-side tick state from configuration.
///
/// # Errors
///
/// Returns [`ClockError::InvalidConfig`] if the clock settings are unusable.
pub fn build_context(config: &SimulationConfig) -> Result<TickContext, ClockError> {
    Ok(TickContext::new(
        SimulationClock::new(&config.clock)?,
        Integrator::new(config.integrator.clone()),
        InfectionPropagator::new(config.propagation.clone()),
    ))
}

/// The propagation random source for a configured seed.
pub fn seeded_source(seed: u64) -> RngSource<StdRng> {
    RngSource(StdRng::seed_from_u64(seed))
}

/// Spawn the clock and growth loops for `session`.
///
/// # Errors
///
/// Returns [`SessionError::AlreadyStarted`] or
/// [`SessionError::AlreadyStopped`] if the session cannot be started.
pub fn start<S>(
    session: &Arc<Session>,
    ctx: TickContext,
    source: S,
) -> Result<SessionTasks, SessionError>
where
    S: SeedingSource + Send + 'static,
{
    session.mark_started()?;
    info!(
        tick_interval_ms = ctx.clock.interval().as_millis(),
        growth_interval_secs = session.growth_interval().as_secs(),
        "Session starting"
    );
    let clock = tokio::spawn(run_clock(Arc::clone(session), ctx, source));
    let growth = tokio::spawn(run_growth(Arc::clone(session)));
    Ok(SessionTasks { clock, growth })
}

/// Run ticks until the session stops. Returns the number of ticks attempted.
///
/// The first tick runs immediately; each later one follows the previous
/// by the clock interval, so passes never overlap.
pub async fn run_clock<S>(session: Arc<Session>, mut ctx: TickContext, mut source: S) -> u64
where
    S: SeedingSource + Send,
{
    let interval = ctx.clock.interval();
    let mut attempted: u64 = 0;

    while !session.is_stop_requested() {
        if let Err(err) = session.tick_once(&mut ctx, &mut source).await {
            session.report_tick_failure(&err);
        }
        attempted = attempted.saturating_add(1);

        if !session.sleep_unless_stopped(interval).await {
            break;
        }
    }

    info!(ticks = attempted, final_tick = ctx.clock.tick(), "Clock stopped");
    attempted
}

/// Grant growth points until the session stops. Returns the number granted.
///
/// The first point is granted as soon as growth is switched on; later ones
/// follow one interval apart. A grant that comes due while growth is off is
/// skipped, and switching growth back on grants again immediately.
pub async fn run_growth(session: Arc<Session>) -> u64 {
    let interval = session.growth_interval();
    let mut granted: u64 = 0;

    loop {
        if !session.wait_for_growth().await {
            break;
        }
        if session.grow_once().await {
            granted = granted.saturating_add(1);
        }
        if !session.sleep_unless_stopped(interval).await {
            break;
        }
    }

    info!(points = granted, "Growth stopped");
    granted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use contagion_world::default_world;

    use super::*;

    fn make_session() -> Arc<Session> {
        let config = SimulationConfig::default();
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        Arc::new(Session::new(&config, default_world().unwrap(), today))
    }

    fn start_default(session: &Arc<Session>) -> SessionTasks {
        let config = SimulationConfig::default();
        let ctx = build_context(&config).unwrap();
        start(session, ctx, seeded_source(config.clock.seed)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticks_on_interval() {
        let session = make_session();
        let tasks = start_default(&session);

        // Ticks at 0, 240, 480, 720, 960 ms.
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(session.tick(), 5);

        assert!(session.stop().is_ok());
        let ticks = tokio::time::timeout(Duration::from_secs(1), tasks.clock).await;
        assert_eq!(ticks.ok().and_then(Result::ok), Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn growth_grants_only_while_enabled() {
        let session = make_session();
        let tasks = start_default(&session);

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(session.points().await, 0);

        // Grants at 25, 35, 45, and 55 seconds.
        session.start_growth().await;
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(session.points().await, 4);

        session.stop_growth().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        // The grant due at 65 seconds is skipped.
        assert_eq!(session.points().await, 4);

        assert!(session.stop().is_ok());
        let granted = tokio::time::timeout(Duration::from_secs(1), tasks.growth).await;
        assert_eq!(granted.ok().and_then(Result::ok), Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn first_point_arrives_when_growth_starts() {
        let session = make_session();
        let tasks = start_default(&session);

        tokio::time::sleep(Duration::from_secs(3)).await;
        session.start_growth().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.points().await, 1);

        // The next one waits a full interval.
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(session.points().await, 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.points().await, 2);

        assert!(session.stop().is_ok());
        let _ = tasks.growth.await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_both_tasks_promptly() {
        let session = make_session();
        session.start_growth().await;
        let tasks = start_default(&session);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(session.stop().is_ok());

        let clock = tokio::time::timeout(Duration::from_millis(10), tasks.clock).await;
        let growth = tokio::time::timeout(Duration::from_millis(10), tasks.growth).await;
        assert!(clock.is_ok());
        assert!(growth.is_ok());
        assert!(!session.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn diverging_ticks_do_not_stop_the_clock() {
        let session = make_session();
        assert!(session.seed_infection("Oceania").await.is_ok());

        let mut config = SimulationConfig::default();
        config.integrator.clamp_non_negative = false;
        config.integrator.beta_scale = 1e15;
        let ctx = build_context(&config).unwrap();
        let tasks = start(&session, ctx, seeded_source(1)).unwrap();

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        // Oceania diverges on every tick, yet the counter keeps moving.
        assert_eq!(session.tick(), 5);
        let last = session.last_summary().await.unwrap();
        assert_eq!(last.tick, 5);
        assert_eq!(last.diverged, ["Oceania"]);

        assert!(session.stop().is_ok());
        let _ = tasks.clock.await;
    }

    #[tokio::test]
    async fn double_start_rejected() {
        let session = make_session();
        let _tasks = start_default(&session);
        let config = SimulationConfig::default();
        let ctx = build_context(&config).unwrap();
        let again = start(&session, ctx, seeded_source(0));
        assert!(matches!(again, Err(SessionError::AlreadyStarted)));
        assert!(session.stop().is_ok());
    }
}
