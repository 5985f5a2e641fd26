//! Tick cycle: one integrator pass, then propagation on scheduled ticks.
//!
//! Each tick runs these phases in order:
//!
//! 1. **Advance** -- bump the clock.
//! 2. **Integrate** -- one Euler pass over every region with the trait
//!    levels captured for this tick.
//! 3. **Propagate** -- on every `propagation_every`-th tick, run the
//!    cross-region seeding rule.
//!
//! Regions whose integrator pass diverges keep their previous compartments
//! and are listed in [`TickSummary::diverged`]. The rest of the world still
//! advances and propagation still runs on schedule.
//!
//! The caller holds the region graph exclusively for the whole call, so a
//! tick is never observed half-applied.

use contagion_types::TraitLevels;
use contagion_world::RegionGraph;
use tracing::debug;

use crate::clock::{ClockError, SimulationClock};
use crate::integrator::Integrator;
use crate::propagation::{InfectionPropagator, SeedingSource};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// One or more regions ended the integrator pass with NaN or infinite
    /// compartments. Those regions kept their previous values.
    #[error("non-finite compartments in {regions:?}")]
    NonFinite {
        /// Names of the diverged regions.
        regions: Vec<String>,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Whether propagation ran on this tick.
    pub propagated: bool,
    /// Regions newly seeded by propagation, in seeding order.
    pub seeded: Vec<String>,
    /// Regions whose integrator pass produced non-finite compartments.
    pub diverged: Vec<String>,
}

/// Engine-side state carried from tick to tick.
///
/// Owned by the clock task. The region graph and disease live in the
/// session and are passed in per tick.
#[derive(Debug, Clone)]
pub struct TickContext {
    /// The simulation clock.
    pub clock: SimulationClock,
    /// The Euler integrator.
    pub integrator: Integrator,
    /// The seeding rule.
    pub propagator: InfectionPropagator,
}

impl TickContext {
    /// Bundle the tick components.
    pub const fn new(
        clock: SimulationClock,
        integrator: Integrator,
        propagator: InfectionPropagator,
    ) -> Self {
        Self {
            clock,
            integrator,
            propagator,
        }
    }
}

/// Execute one complete tick.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows. Diverged
/// regions do not fail the tick; they are reported in the summary.
pub fn run_tick(
    ctx: &mut TickContext,
    graph: &mut RegionGraph,
    levels: &TraitLevels,
    source: &mut dyn SeedingSource,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Advance ---
    let tick = ctx.clock.advance()?;

    // --- Phase 2: Integrate ---
    let diverged = match ctx.integrator.advance(graph, levels) {
        Ok(()) => Vec::new(),
        Err(TickError::NonFinite { regions }) => regions,
        Err(err) => return Err(err),
    };

    // --- Phase 3: Propagate ---
    let propagated = ctx.clock.propagation_due();
    let seeded = if propagated {
        ctx.propagator.propagate(graph, source)
    } else {
        Vec::new()
    };

    debug!(
        tick,
        propagated,
        seeded = seeded.len(),
        diverged = diverged.len(),
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        propagated,
        seeded,
        diverged,
    })
}
