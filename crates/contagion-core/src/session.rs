//! The game session: shared state and the presentation-facing API.
//!
//! A [`Session`] owns the region graph, the disease, and the news feed, and
//! is shared behind an [`Arc`](std::sync::Arc) between the clock task, the
//! growth task, and every reader (HTTP handlers, the engine's reporter).
//!
//! # Locking
//!
//! - The region graph sits behind one [`RwLock`]. A whole tick runs under
//!   the write lock, so readers only ever see complete ticks.
//! - The disease sits behind one [`Mutex`]. An upgrade checks and spends
//!   its point under the same guard, and the growth task grants points
//!   under it too.
//! - No code path holds both locks at once.
//!
//! Growth start/stop and session stop use the same flag-plus-[`Notify`]
//! shape: the flag is the truth, the notify only wakes sleepers early.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use contagion_types::{
    DiseaseStatus, DiseaseTrait, RegionColor, RegionStats, SessionStatus, TickBroadcast,
    TraitLevels, WorldRates,
};
use contagion_world::RegionGraph;
use tokio::sync::{Mutex, Notify, RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::disease::DiseaseTraits;
use crate::news::NewsFeed;
use crate::propagation::SeedingSource;
use crate::stats;
use crate::tick::{self, TickContext, TickError, TickSummary};

/// Capacity of the tick broadcast channel.
const BROADCAST_CAPACITY: usize = 64;

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No region with this name exists.
    #[error("no such region: {0}")]
    UnknownRegion(String),

    /// The background tasks were already started.
    #[error("session already started")]
    AlreadyStarted,

    /// The session was already stopped.
    #[error("session already stopped")]
    AlreadyStopped,
}

/// Shared state of one game session.
#[derive(Debug)]
pub struct Session {
    graph: RwLock<RegionGraph>,
    disease: Mutex<DiseaseTraits>,
    news: Mutex<NewsFeed>,

    /// Wakes the growth task when growth is switched on.
    growth_notify: Notify,

    started: AtomicBool,
    stop_requested: AtomicBool,
    stop_notify: Notify,

    /// Mirror of the clock's tick counter for lock-free reads.
    tick: AtomicU64,
    last_summary: Mutex<Option<TickSummary>>,
    events: broadcast::Sender<TickBroadcast>,

    tick_interval: Duration,
    growth_interval: Duration,
    seed_amount: f64,
}

impl Session {
    /// Create a session over a freshly built region graph.
    ///
    /// `today` picks the default calendar start when the configuration
    /// does not name one.
    pub fn new(config: &SimulationConfig, graph: RegionGraph, today: NaiveDate) -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            graph: RwLock::new(graph),
            disease: Mutex::new(DiseaseTraits::new(
                &config.disease.name,
                config.disease.initial_points,
            )),
            news: Mutex::new(NewsFeed::from_config(&config.news, today)),
            growth_notify: Notify::new(),
            started: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            tick: AtomicU64::new(0),
            last_summary: Mutex::new(None),
            events,
            tick_interval: Duration::from_millis(config.clock.tick_interval_ms),
            growth_interval: Duration::from_secs(config.disease.growth_interval_secs),
            seed_amount: config.propagation.seed_amount,
        }
    }

    // -----------------------------------------------------------------------
    // Disease
    // -----------------------------------------------------------------------

    /// Display name of the disease.
    pub async fn disease_name(&self) -> String {
        self.disease.lock().await.name().to_owned()
    }

    /// Spend one point to raise a trait. Returns whether it was applied.
    pub async fn increase(&self, which: DiseaseTrait) -> bool {
        self.increase_with_status(which).await.0
    }

    /// Spend one point to raise a trait and read the disease back under the
    /// same guard, so the status reflects exactly this upgrade.
    pub async fn increase_with_status(&self, which: DiseaseTrait) -> (bool, DiseaseStatus) {
        let (applied, status) = {
            let mut disease = self.disease.lock().await;
            let applied = disease.increase(which);
            (applied, disease.status())
        };
        if applied {
            info!(trait_name = %which, level = status.levels.get(which), "Trait upgraded");
        } else {
            debug!(trait_name = %which, "Upgrade refused, no points");
        }
        (applied, status)
    }

    /// Current level of one trait.
    pub async fn level(&self, which: DiseaseTrait) -> u32 {
        self.disease.lock().await.level(which)
    }

    /// Snapshot of all trait levels.
    pub async fn levels(&self) -> TraitLevels {
        self.disease.lock().await.levels()
    }

    /// Unspent upgrade points.
    pub async fn points(&self) -> u32 {
        self.disease.lock().await.points()
    }

    /// Adjust the point pool.
    pub async fn add_points(&self, delta: i32) {
        self.disease.lock().await.add_points(delta);
    }

    /// Name, levels, points, and growth flag in one read.
    pub async fn disease_status(&self) -> DiseaseStatus {
        self.disease.lock().await.status()
    }

    /// Turn automatic point growth on.
    pub async fn start_growth(&self) {
        self.disease.lock().await.start_growth();
        self.growth_notify.notify_waiters();
        info!("Point growth started");
    }

    /// Turn automatic point growth off.
    pub async fn stop_growth(&self) {
        self.disease.lock().await.stop_growth();
        info!("Point growth stopped");
    }

    /// Whether point growth is on.
    pub async fn growth_enabled(&self) -> bool {
        self.disease.lock().await.growth_enabled()
    }

    // -----------------------------------------------------------------------
    // Regions
    // -----------------------------------------------------------------------

    /// Seed the infection in a region (game start, region choice).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRegion`] if the name is not a region.
    pub async fn seed_infection(&self, region: &str) -> Result<(), SessionError> {
        self.graph
            .write()
            .await
            .seed(region, self.seed_amount)
            .map_err(|err| {
                warn!(region, error = %err, "Seed rejected");
                SessionError::UnknownRegion(region.to_owned())
            })?;
        info!(region, amount = self.seed_amount, "Infection seeded");
        Ok(())
    }

    /// Region names in iteration order.
    pub async fn region_names(&self) -> Vec<String> {
        self.graph.read().await.names()
    }

    /// Per-region stats lines.
    pub async fn region_stats(&self) -> Vec<RegionStats> {
        stats::region_stats(&*self.graph.read().await)
    }

    /// World-wide shares in percent.
    pub async fn world_rates(&self) -> WorldRates {
        stats::world_rates(&*self.graph.read().await)
    }

    /// One color per region, in the same order as [`region_names`](Self::region_names).
    pub async fn colors(&self) -> Vec<RegionColor> {
        stats::colors(&*self.graph.read().await)
    }

    // -----------------------------------------------------------------------
    // News
    // -----------------------------------------------------------------------

    /// Current calendar date; advances the calendar by one day.
    pub async fn next_date(&self) -> String {
        self.news.lock().await.next_date()
    }

    /// Scrolled headline ticker; advances the scroll by one character.
    pub async fn news_ticker(&self) -> String {
        self.news.lock().await.scrolled()
    }

    /// Add a headline to the ticker.
    pub async fn push_headline(&self, headline: String) {
        self.news.lock().await.push_headline(headline);
    }

    // -----------------------------------------------------------------------
    // Ticks
    // -----------------------------------------------------------------------

    /// Run one tick against the shared state.
    ///
    /// Trait levels are captured before the graph is locked and held fixed
    /// for the whole pass. On success the summary is stored and broadcast,
    /// including when some regions diverged.
    ///
    /// # Errors
    ///
    /// Propagates the [`TickError`] from [`tick::run_tick`].
    pub async fn tick_once<S>(
        &self,
        ctx: &mut TickContext,
        source: &mut S,
    ) -> Result<TickSummary, TickError>
    where
        S: SeedingSource + Send,
    {
        let levels = self.levels().await;
        let (result, world) = {
            let mut graph = self.graph.write().await;
            let result = tick::run_tick(ctx, &mut graph, &levels, source);
            (result, stats::world_rates(&graph))
        };
        self.tick.store(ctx.clock.tick(), Ordering::Release);

        let summary = result?;
        if !summary.seeded.is_empty() {
            info!(tick = summary.tick, seeded = ?summary.seeded, "Infection spread");
        }
        if !summary.diverged.is_empty() {
            warn!(
                tick = summary.tick,
                regions = ?summary.diverged,
                "Regions diverged, previous values kept"
            );
        }
        // No subscribers is fine.
        let _ = self.events.send(TickBroadcast {
            tick: summary.tick,
            propagated: summary.propagated,
            seeded: summary.seeded.clone(),
            diverged: summary.diverged.clone(),
            world,
        });
        *self.last_summary.lock().await = Some(summary.clone());
        Ok(summary)
    }

    /// Grant one growth point if growth is on. Returns whether it was granted.
    pub async fn grow_once(&self) -> bool {
        let mut disease = self.disease.lock().await;
        let granted = disease.grow();
        if granted {
            debug!(points = disease.points(), "Growth point granted");
        }
        granted
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick.load(Ordering::Acquire)
    }

    /// The most recent successful tick, if any.
    pub async fn last_summary(&self) -> Option<TickSummary> {
        self.last_summary.lock().await.clone()
    }

    /// Receive a [`TickBroadcast`] after every successful tick.
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.events.subscribe()
    }

    /// Real-time spacing between ticks.
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Real-time spacing between growth points.
    pub const fn growth_interval(&self) -> Duration {
        self.growth_interval
    }

    /// Runtime status for the status endpoint.
    pub async fn status(&self) -> SessionStatus {
        SessionStatus {
            tick: self.tick(),
            tick_interval_ms: u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX),
            growth_enabled: self.growth_enabled().await,
            running: self.is_running(),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Mark the session as started.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyStarted`] on a second call, or
    /// [`SessionError::AlreadyStopped`] after a stop.
    pub fn mark_started(&self) -> Result<(), SessionError> {
        if self.is_stop_requested() {
            return Err(SessionError::AlreadyStopped);
        }
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(SessionError::AlreadyStarted);
        }
        Ok(())
    }

    /// Whether the background tasks are live.
    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.is_stop_requested()
    }

    /// Ask both background tasks to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyStopped`] on a second call.
    pub fn stop(&self) -> Result<(), SessionError> {
        if self.stop_requested.swap(true, Ordering::AcqRel) {
            return Err(SessionError::AlreadyStopped);
        }
        self.stop_notify.notify_waiters();
        self.growth_notify.notify_waiters();
        info!(tick = self.tick(), "Session stop requested");
        Ok(())
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless the session is stopped first.
    ///
    /// Returns `true` if the full duration elapsed and the session is still
    /// live.
    pub async fn sleep_unless_stopped(&self, duration: Duration) -> bool {
        let notified = self.stop_notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_stop_requested() {
            return false;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => !self.is_stop_requested(),
            () = notified => false,
        }
    }

    /// Wait until growth is on. Returns `false` if the session stops first.
    pub async fn wait_for_growth(&self) -> bool {
        loop {
            let notified = self.growth_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_stop_requested() {
                return false;
            }
            if self.growth_enabled().await {
                return true;
            }
            notified.await;
        }
    }

    /// Log a failed tick. The clock keeps running.
    pub(crate) fn report_tick_failure(&self, err: &TickError) {
        warn!(tick = self.tick(), error = %err, "Tick failed, continuing");
    }
}
