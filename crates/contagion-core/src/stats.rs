//! Read-only derivations for the presentation layer.
//!
//! Per-region rates use the compartment sum at read time. World rates use
//! the initial totals captured at load time and are expressed as
//! percentages. A zero denominator yields all-zero rates.

use contagion_types::{Compartments, RegionColor, RegionStats, WorldRates};
use contagion_world::RegionGraph;

/// Compartment shares of a single region, as fractions of its current
/// population.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionRates {
    /// Infected share.
    pub infected: f64,
    /// Dead share.
    pub dead: f64,
    /// Recovered share.
    pub recovered: f64,
    /// Healthy share.
    pub healthy: f64,
}

/// Shares of each compartment in the region's current population.
pub fn region_rates(c: &Compartments) -> RegionRates {
    let pop = c.total();
    if pop == 0.0 || !pop.is_finite() {
        return RegionRates::default();
    }
    RegionRates {
        infected: c.infected / pop,
        dead: c.dead / pop,
        recovered: c.recovered / pop,
        healthy: c.healthy / pop,
    }
}

/// Map color for a region.
pub fn region_color(c: &Compartments) -> RegionColor {
    let rates = region_rates(c);
    RegionColor {
        r: 255.0 * (rates.infected + rates.dead),
        g: 0.0,
        b: 255.0 * rates.dead,
    }
}

/// One color per region, in graph iteration order.
pub fn colors(graph: &RegionGraph) -> Vec<RegionColor> {
    graph.iter().map(|r| region_color(&r.compartments)).collect()
}

/// One stats line per region, in graph iteration order.
pub fn region_stats(graph: &RegionGraph) -> Vec<RegionStats> {
    graph
        .iter()
        .map(|r| RegionStats::new(r.name(), &r.compartments))
        .collect()
}

/// World-wide compartment shares, in percent of the initial population.
pub fn world_rates(graph: &RegionGraph) -> WorldRates {
    let initial = graph.initial_total();
    if initial == 0.0 || !initial.is_finite() {
        return WorldRates::default();
    }
    let sum = graph.iter().fold(Compartments::default(), |acc, r| Compartments {
        healthy: acc.healthy + r.compartments.healthy,
        infected: acc.infected + r.compartments.infected,
        recovered: acc.recovered + r.compartments.recovered,
        dead: acc.dead + r.compartments.dead,
    });
    let pct = |v: f64| v / initial * 100.0;
    WorldRates {
        infected: pct(sum.infected),
        dead: pct(sum.dead),
        recovered: pct(sum.recovered),
        healthy: pct(sum.healthy),
    }
}
