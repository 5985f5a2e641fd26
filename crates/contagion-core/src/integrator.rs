//! Fixed-step Euler integration of the per-region epidemic model.
//!
//! Each tick advances every region through `steps_per_tick` sub-steps of
//! size `dt` using the trait levels captured at the start of the tick:
//!
//! ```text
//! β = (S / area) · infectivity · beta_scale
//! γ = (1/camouflage + 1/reassembly + 1/resistance) · removal_scale
//! δ = lethality · mortality_scale
//!
//! S' = -β·S·I
//! I' =  β·S·I − γ·I − δ·I
//! R' =  γ·I
//! M' =  δ·I
//! ```
//!
//! `resistance` is cold resistance below the cold threshold and heat
//! resistance otherwise. β is fixed for the whole tick from the healthy
//! population at the start of the tick.
//!
//! All four flows of a sub-step are computed from the values at the start
//! of that sub-step, so the compartment sum is conserved. This is a
//! simultaneous update: a sequential scheme that feeds the freshly updated
//! `S` into the `I` equation would not conserve the sum and gives slightly
//! different trajectories. With clamping
//! enabled the flows are limited to what their source compartment holds:
//! infection never exceeds `S`, and removal plus mortality never exceed
//! `I` (scaled down together). No compartment can then go negative.
//!
//! Results are published to the region only after every sub-step has run.

use contagion_types::{Compartments, TraitLevels};
use contagion_world::{Region, RegionGraph};
use tracing::{debug, warn};

use crate::config::IntegratorConfig;
use crate::tick::TickError;

/// Per-tick rate coefficients for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Transmission coefficient β.
    pub beta: f64,
    /// Removal (recovery) coefficient γ.
    pub gamma: f64,
    /// Mortality coefficient δ.
    pub delta: f64,
}

/// The Euler integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    config: IntegratorConfig,
}

impl Integrator {
    /// Create an integrator from configuration.
    pub const fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Derive the tick's coefficients for a region.
    pub fn coefficients(
        &self,
        levels: &TraitLevels,
        healthy: f64,
        area: f64,
        temperature: f64,
    ) -> Coefficients {
        let resistance = if temperature < self.config.cold_threshold_c {
            levels.cold_resistance
        } else {
            levels.heat_resistance
        };
        let removal = reciprocal(levels.camouflage)
            + reciprocal(levels.reassembly)
            + reciprocal(resistance);

        Coefficients {
            beta: healthy / area * f64::from(levels.infectivity) * self.config.beta_scale,
            gamma: removal * self.config.removal_scale,
            delta: f64::from(levels.lethality) * self.config.mortality_scale,
        }
    }

    /// Advance compartments by a single sub-step.
    pub fn step(&self, c: Compartments, k: &Coefficients) -> Compartments {
        let dt = self.config.dt;
        let mut infection = dt * k.beta * c.healthy * c.infected;
        let mut removal = dt * k.gamma * c.infected;
        let mut mortality = dt * k.delta * c.infected;

        if self.config.clamp_non_negative {
            infection = infection.clamp(0.0, c.healthy.max(0.0));
            removal = removal.max(0.0);
            mortality = mortality.max(0.0);
            let outflow = removal + mortality;
            let available = c.infected.max(0.0);
            if outflow > available {
                let scale = available / outflow;
                removal *= scale;
                mortality *= scale;
            }
        }

        Compartments {
            healthy: c.healthy - infection,
            infected: c.infected + infection - removal - mortality,
            recovered: c.recovered + removal,
            dead: c.dead + mortality,
        }
    }

    /// Run a full tick of sub-steps over a set of compartments.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::NonFinite`] if any compartment ends the pass as
    /// NaN or infinite. Only reachable with clamping disabled.
    pub fn integrate(
        &self,
        name: &str,
        start: Compartments,
        levels: &TraitLevels,
        area: f64,
        temperature: f64,
    ) -> Result<Compartments, TickError> {
        let k = self.coefficients(levels, start.healthy, area, temperature);
        let mut c = start;
        for _ in 0..self.config.steps_per_tick {
            c = self.step(c, &k);
        }
        if c.is_finite() {
            Ok(c)
        } else {
            Err(TickError::NonFinite {
                regions: vec![name.to_owned()],
            })
        }
    }

    /// Advance one region in place.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::NonFinite`] and leaves the region untouched if
    /// the pass diverges.
    pub fn advance_region(&self, region: &mut Region, levels: &TraitLevels) -> Result<(), TickError> {
        let next = self.integrate(
            region.name(),
            region.compartments,
            levels,
            region.area(),
            region.temperature(),
        )?;
        region.compartments = next;
        Ok(())
    }

    /// Advance every region of the graph by one tick.
    ///
    /// Regions that diverge keep their previous compartments; the others
    /// are still advanced.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::NonFinite`] naming every region that diverged.
    pub fn advance(&self, graph: &mut RegionGraph, levels: &TraitLevels) -> Result<(), TickError> {
        let mut diverged = Vec::new();
        for region in graph.iter_mut() {
            if let Err(TickError::NonFinite { regions }) = self.advance_region(region, levels) {
                warn!(region = region.name(), "Compartments diverged, keeping previous values");
                diverged.extend(regions);
            }
        }
        if diverged.is_empty() {
            debug!(regions = graph.len(), "Integrator pass complete");
            Ok(())
        } else {
            Err(TickError::NonFinite { regions: diverged })
        }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(IntegratorConfig::default())
    }
}

fn reciprocal(level: u32) -> f64 {
    1.0 / f64::from(level)
}
