//! Core value structs for the Contagion simulation.
//!
//! Populations are expressed in millions throughout. None of these types
//! hold references into the region graph; they are plain snapshots that
//! can be copied out from under a lock and handed to readers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::DiseaseTrait;

// ---------------------------------------------------------------------------
// Trait levels
// ---------------------------------------------------------------------------

/// Snapshot of all six disease trait levels.
///
/// Levels are positive and start at 1. The integrator takes one snapshot
/// per tick and treats it as constant for all sub-steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TraitLevels {
    /// Camouflage level.
    pub camouflage: u32,
    /// Infectivity level.
    pub infectivity: u32,
    /// Lethality level.
    pub lethality: u32,
    /// Genetic reassembly level.
    pub reassembly: u32,
    /// Heat resistance level.
    pub heat_resistance: u32,
    /// Cold resistance level.
    pub cold_resistance: u32,
}

impl TraitLevels {
    /// Every trait at level 1.
    pub const INITIAL: Self = Self {
        camouflage: 1,
        infectivity: 1,
        lethality: 1,
        reassembly: 1,
        heat_resistance: 1,
        cold_resistance: 1,
    };

    /// Read the level of a single trait.
    pub const fn get(&self, which: DiseaseTrait) -> u32 {
        match which {
            DiseaseTrait::Camouflage => self.camouflage,
            DiseaseTrait::Infectivity => self.infectivity,
            DiseaseTrait::Lethality => self.lethality,
            DiseaseTrait::Reassembly => self.reassembly,
            DiseaseTrait::HeatResistance => self.heat_resistance,
            DiseaseTrait::ColdResistance => self.cold_resistance,
        }
    }

    /// Mutable access to a single trait level.
    pub const fn get_mut(&mut self, which: DiseaseTrait) -> &mut u32 {
        match which {
            DiseaseTrait::Camouflage => &mut self.camouflage,
            DiseaseTrait::Infectivity => &mut self.infectivity,
            DiseaseTrait::Lethality => &mut self.lethality,
            DiseaseTrait::Reassembly => &mut self.reassembly,
            DiseaseTrait::HeatResistance => &mut self.heat_resistance,
            DiseaseTrait::ColdResistance => &mut self.cold_resistance,
        }
    }
}

impl Default for TraitLevels {
    fn default() -> Self {
        Self::INITIAL
    }
}

// ---------------------------------------------------------------------------
// Compartments
// ---------------------------------------------------------------------------

/// The four population compartments of a region, in millions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Compartments {
    /// Susceptible population (`S`).
    pub healthy: f64,
    /// Infected population (`I`).
    pub infected: f64,
    /// Recovered population (`R`).
    pub recovered: f64,
    /// Dead population (`M`).
    pub dead: f64,
}

impl Compartments {
    /// A fully healthy population.
    pub const fn healthy(population: f64) -> Self {
        Self {
            healthy: population,
            infected: 0.0,
            recovered: 0.0,
            dead: 0.0,
        }
    }

    /// Sum of all four compartments.
    pub fn total(&self) -> f64 {
        self.healthy + self.infected + self.recovered + self.dead
    }

    /// Whether every compartment is a finite number.
    pub const fn is_finite(&self) -> bool {
        self.healthy.is_finite()
            && self.infected.is_finite()
            && self.recovered.is_finite()
            && self.dead.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Display projections
// ---------------------------------------------------------------------------

/// Per-region statistics handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionStats {
    /// Region name.
    pub name: String,
    /// Current total population (sum of compartments at read time).
    pub population: f64,
    /// Healthy population.
    pub healthy: f64,
    /// Recovered population.
    pub recovered: f64,
    /// Infected population.
    pub infected: f64,
    /// Dead population.
    pub dead: f64,
}

impl RegionStats {
    /// Build the stats line for a region from its compartments.
    pub fn new(name: &str, compartments: &Compartments) -> Self {
        Self {
            name: name.to_owned(),
            population: compartments.total(),
            healthy: compartments.healthy,
            recovered: compartments.recovered,
            infected: compartments.infected,
            dead: compartments.dead,
        }
    }

    /// Multi-line text block used by the information panel.
    pub fn summary(&self) -> String {
        format!(
            "{}\n{:.2} M\n\nHealthy: {:.2} M\nRecovered: {:.2} M\nInfected: {:.2} M\nDead: {:.2} M\n\n",
            self.name, self.population, self.healthy, self.recovered, self.infected, self.dead
        )
    }
}

/// Map fill color of a region.
///
/// Channels are not clamped; values above 255 are left to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionColor {
    /// Red channel: `255 * (infected_rate + dead_rate)`.
    pub r: f64,
    /// Green channel, always zero.
    pub g: f64,
    /// Blue channel: `255 * dead_rate`.
    pub b: f64,
}

/// World-wide compartment shares, in percent of the initial population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldRates {
    /// Infected share.
    pub infected: f64,
    /// Dead share.
    pub dead: f64,
    /// Recovered share.
    pub recovered: f64,
    /// Healthy share.
    pub healthy: f64,
}

impl WorldRates {
    /// Sum of the four shares. Equals 100 while the model conserves
    /// population.
    pub fn sum(&self) -> f64 {
        self.infected + self.dead + self.recovered + self.healthy
    }

    /// Display labels in the order infected, dead, recovered, healthy.
    pub fn labels(&self) -> [String; 4] {
        [
            format!("Infected\n{:.2}%", self.infected),
            format!("Dead\n{:.2}%", self.dead),
            format!("Recovered\n{:.2}%", self.recovered),
            format!("Healthy\n{:.2}%", self.healthy),
        ]
    }
}

/// Read-only view of the disease for the upgrade panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DiseaseStatus {
    /// Disease display name.
    pub name: String,
    /// Current trait levels.
    pub levels: TraitLevels,
    /// Unspent upgrade points.
    pub points: u32,
    /// Whether points currently accrue over time.
    pub growth_enabled: bool,
}

/// Lightweight tick summary pushed to subscribers after every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickBroadcast {
    /// The tick number that just completed.
    pub tick: u64,
    /// Whether infection propagation ran on this tick.
    pub propagated: bool,
    /// Regions newly seeded by propagation on this tick.
    pub seeded: Vec<String>,
    /// Regions that diverged this tick and kept their previous values.
    #[serde(default)]
    pub diverged: Vec<String>,
    /// World rates at the end of the tick.
    pub world: WorldRates,
}

/// Runtime status of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionStatus {
    /// Number of completed ticks.
    pub tick: u64,
    /// Real-time milliseconds between ticks.
    pub tick_interval_ms: u64,
    /// Whether upgrade points currently accrue.
    pub growth_enabled: bool,
    /// Whether the background tasks are running.
    pub running: bool,
}
