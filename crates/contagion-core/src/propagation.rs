//! Cross-region infection seeding.
//!
//! Every few ticks each region whose infected share of its initial
//! population has reached the threshold gets one chance to spread:
//!
//! - If it has no infected at all and the die lands on the sentinel face,
//!   it re-seeds itself.
//! - Otherwise one neighbor is picked uniformly; if that neighbor has no
//!   infected, it is seeded.
//!
//! The die is only rolled when the region's infected count is zero. With a
//! positive threshold the first branch cannot trigger, since a region with
//! zero infected never reaches the threshold. It only fires with a zero
//! threshold, where uninfected regions qualify too.
//!
//! Regions are visited in graph order and seeds take effect immediately, so
//! a region seeded earlier in the pass is seen as infected by later ones.
//! Seeding never removes infection.
//!
//! Randomness comes from a [`SeedingSource`], so tests can script exact
//! decisions and runs can be replayed from a seed.

use contagion_world::RegionGraph;
use rand::Rng;
use tracing::debug;

use crate::config::PropagationConfig;

/// Source of the propagator's random decisions.
pub trait SeedingSource {
    /// Uniform draw in `0..sides`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Uniform index in `0..len`. Only called with `len > 0`.
    fn pick_neighbor(&mut self, len: usize) -> usize;
}

/// [`SeedingSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> SeedingSource for RngSource<R> {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.0.random_range(0..sides)
    }

    fn pick_neighbor(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.random_range(0..len)
    }
}

/// The seeding rule.
#[derive(Debug, Clone, PartialEq)]
pub struct InfectionPropagator {
    config: PropagationConfig,
}

impl InfectionPropagator {
    /// Create a propagator from configuration.
    pub const fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Run one propagation pass. Returns the names of newly seeded regions
    /// in the order they were seeded.
    pub fn propagate(&self, graph: &mut RegionGraph, source: &mut dyn SeedingSource) -> Vec<String> {
        let mut seeded = Vec::new();

        for pos in 0..graph.len() {
            let Some(region) = graph.at(pos) else {
                continue;
            };
            let initial = region.initial_total();
            if initial <= 0.0 {
                continue;
            }
            let infected = region.compartments.infected;
            if infected / initial < self.config.infection_threshold {
                continue;
            }

            let target = if infected == 0.0
                && source.roll(self.config.self_seed_sides) == self.config.self_seed_sentinel
            {
                Some(pos)
            } else {
                let neighbors = region.neighbors();
                if neighbors.is_empty() {
                    None
                } else {
                    let pick = source.pick_neighbor(neighbors.len());
                    neighbors
                        .get(pick)
                        .copied()
                        .filter(|&n| graph.at(n).is_some_and(|r| r.is_uninfected()))
                }
            };

            if let Some(target) = target
                && let Some(region) = graph.at_mut(target)
            {
                region.seed(self.config.seed_amount);
                debug!(from = pos, region = region.name(), "Infection seeded");
                seeded.push(region.name().to_owned());
            }
        }

        seeded
    }
}

impl Default for InfectionPropagator {
    fn default() -> Self {
        Self::new(PropagationConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use contagion_world::{RegionRecord, default_world};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    /// Replays fixed decisions and counts how often it was asked.
    #[derive(Default)]
    struct Scripted {
        rolls: VecDeque<u32>,
        picks: VecDeque<usize>,
        roll_calls: usize,
        pick_calls: usize,
    }

    impl SeedingSource for Scripted {
        fn roll(&mut self, _sides: u32) -> u32 {
            self.roll_calls = self.roll_calls.saturating_add(1);
            self.rolls.pop_front().unwrap_or(0)
        }

        fn pick_neighbor(&mut self, _len: usize) -> usize {
            self.pick_calls = self.pick_calls.saturating_add(1);
            self.picks.pop_front().unwrap_or(0)
        }
    }

    fn record(name: &str, population: f64, neighbors: &[&str]) -> RegionRecord {
        RegionRecord {
            name: name.to_owned(),
            population,
            area: 1_000.0,
            temperature: 15.0,
            neighbors: neighbors.iter().map(|&n| n.to_owned()).collect(),
        }
    }

    fn pair() -> RegionGraph {
        RegionGraph::from_records(
            vec![record("A", 10.0, &["B"]), record("B", 10.0, &["A"])],
            "World",
        )
        .unwrap()
    }

    #[test]
    fn forced_neighbor_is_seeded() {
        let mut graph = pair();
        let _ = graph.seed("A", 5.0);
        let a_before = graph.get("A").map(|r| r.compartments);

        let mut source = Scripted {
            picks: VecDeque::from([0]),
            ..Scripted::default()
        };
        let seeded = InfectionPropagator::default().propagate(&mut graph, &mut source);

        assert_eq!(seeded, vec!["B"]);
        assert_eq!(graph.get("B").map(|r| r.compartments.infected), Some(0.01));
        assert_eq!(graph.get("A").map(|r| r.compartments), a_before);
        // A already had infected, so the die was never rolled.
        assert_eq!(source.roll_calls, 0);
    }

    #[test]
    fn below_threshold_does_nothing() {
        let mut graph = pair();
        let _ = graph.seed("A", 0.99);
        let mut source = Scripted::default();
        let seeded = InfectionPropagator::default().propagate(&mut graph, &mut source);
        assert!(seeded.is_empty());
        assert_eq!(source.pick_calls, 0);
        assert_eq!(graph.get("B").map(|r| r.compartments.infected), Some(0.0));
    }

    #[test]
    fn infected_neighbor_is_not_reseeded() {
        let mut graph = pair();
        let _ = graph.seed("A", 5.0);
        let _ = graph.seed("B", 0.5);
        let mut source = Scripted::default();
        let seeded = InfectionPropagator::default().propagate(&mut graph, &mut source);
        // A picks B (infected), B is below threshold.
        assert!(seeded.is_empty());
        assert_eq!(graph.get("B").map(|r| r.compartments.infected), Some(0.5));
    }

    #[test]
    fn self_seed_on_sentinel_with_zero_threshold() {
        let mut graph = RegionGraph::from_records(vec![record("A", 10.0, &[])], "World")
            .unwrap();
        let propagator = InfectionPropagator::new(PropagationConfig {
            infection_threshold: 0.0,
            ..PropagationConfig::default()
        });
        let mut source = Scripted {
            rolls: VecDeque::from([1]),
            ..Scripted::default()
        };
        let seeded = propagator.propagate(&mut graph, &mut source);
        assert_eq!(seeded, vec!["A"]);
        assert_eq!(graph.get("A").map(|r| r.compartments.infected), Some(0.01));
    }

    #[test]
    fn missed_roll_falls_through_to_neighbor() {
        let mut graph = pair();
        let propagator = InfectionPropagator::new(PropagationConfig {
            infection_threshold: 0.0,
            ..PropagationConfig::default()
        });
        let mut source = Scripted {
            rolls: VecDeque::from([42, 42]),
            picks: VecDeque::from([0, 0]),
            ..Scripted::default()
        };
        let seeded = propagator.propagate(&mut graph, &mut source);
        // A misses its roll and seeds B. B is then infected, so it skips
        // the roll and seeds A straight back.
        assert_eq!(seeded, vec!["B", "A"]);
        assert_eq!(source.roll_calls, 1);
        assert_eq!(graph.get("A").map(|r| r.compartments.infected), Some(0.01));
    }

    #[test]
    fn isolated_region_is_skipped() {
        let mut graph = RegionGraph::from_records(vec![record("A", 10.0, &[])], "World")
            .unwrap();
        let _ = graph.seed("A", 5.0);
        let mut source = Scripted::default();
        let seeded = InfectionPropagator::default().propagate(&mut graph, &mut source);
        assert!(seeded.is_empty());
        assert_eq!(source.pick_calls, 0);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let run = |seed: u64| {
            let mut graph = default_world().unwrap();
            for region in graph.iter_mut() {
                let half = region.initial_total() / 2.0;
                region.seed(half);
            }
            // Clear three regions so picks have somewhere to land.
            for name in ["Asia", "Oceania", "South America"] {
                let _ = graph.seed(name, 0.0);
            }
            let mut source = RngSource(StdRng::seed_from_u64(seed));
            let propagator = InfectionPropagator::default();
            let mut decisions = Vec::new();
            for _ in 0..5 {
                decisions.push(propagator.propagate(&mut graph, &mut source));
            }
            decisions
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn rng_source_stays_in_range() {
        let mut source = RngSource(StdRng::seed_from_u64(7));
        for _ in 0..1_000 {
            assert!(source.roll(100) < 100);
            assert!(source.pick_neighbor(3) < 3);
        }
        assert_eq!(source.roll(0), 0);
    }
}
