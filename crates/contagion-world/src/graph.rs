//! The region graph: all simulated regions keyed by name.
//!
//! Regions live in a `Vec` so iteration order is stable (it follows the
//! order of the reference data), with a side index from name to position
//! for O(1) lookup. Adjacency is stored on each [`Region`] as positions in
//! that same `Vec`.
//!
//! The graph is built once by [`RegionGraph::from_records`] and cannot be
//! resized afterwards.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::WorldError;
use crate::reference::RegionRecord;
use crate::region::Region;

/// Name-keyed collection of every simulated region.
#[derive(Debug, Clone, Default)]
pub struct RegionGraph {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl RegionGraph {
    /// Build the graph from reference records.
    ///
    /// The record named `aggregate` (the "World" roll-up row) is dropped,
    /// both as a region and from every neighbor list. Every region starts
    /// fully healthy.
    ///
    /// # Errors
    ///
    /// - [`WorldError::DuplicateRegion`] when two records share a name.
    /// - [`WorldError::InvalidArea`], [`WorldError::InvalidPopulation`],
    ///   [`WorldError::InvalidTemperature`] for out-of-range values.
    /// - [`WorldError::UnknownNeighbor`] when a neighbor does not resolve.
    /// - [`WorldError::EmptyGraph`] when nothing is left to simulate.
    pub fn from_records(records: Vec<RegionRecord>, aggregate: &str) -> Result<Self, WorldError> {
        let records: Vec<RegionRecord> = records
            .into_iter()
            .filter(|r| r.name != aggregate)
            .collect();

        if records.is_empty() {
            return Err(WorldError::EmptyGraph);
        }

        // First pass: names and scalar validation.
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            record.validate()?;
            if index.insert(record.name.clone(), pos).is_some() {
                return Err(WorldError::DuplicateRegion(record.name.clone()));
            }
        }

        // Second pass: resolve adjacency now that every name has a slot.
        let mut regions = Vec::with_capacity(records.len());
        for record in records {
            let mut seen = HashSet::new();
            let mut neighbors = Vec::with_capacity(record.neighbors.len());
            for neighbor in &record.neighbors {
                if neighbor == aggregate || neighbor == &record.name {
                    continue;
                }
                let Some(&pos) = index.get(neighbor) else {
                    return Err(WorldError::UnknownNeighbor {
                        region: record.name.clone(),
                        neighbor: neighbor.clone(),
                    });
                };
                if seen.insert(pos) {
                    neighbors.push(pos);
                }
            }
            regions.push(Region::new(
                record.name,
                record.population,
                record.area,
                record.temperature,
                neighbors,
            ));
        }

        debug!(regions = regions.len(), "Region graph built");
        Ok(Self { regions, index })
    }

    /// Number of simulated regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the graph holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Position of a region in iteration order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Look up a region by name.
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index_of(name).and_then(|pos| self.regions.get(pos))
    }

    /// Look up a region by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Region> {
        let pos = self.index_of(name)?;
        self.regions.get_mut(pos)
    }

    /// Region at a given position.
    pub fn at(&self, pos: usize) -> Option<&Region> {
        self.regions.get(pos)
    }

    /// Region at a given position, mutably.
    pub fn at_mut(&mut self, pos: usize) -> Option<&mut Region> {
        self.regions.get_mut(pos)
    }

    /// Iterate regions in stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Iterate regions mutably in stable order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.regions.iter_mut()
    }

    /// Region names in iteration order.
    pub fn names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name().to_owned()).collect()
    }

    /// Names of the neighbors of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownRegion`] if `name` is not in the graph.
    pub fn neighbor_names(&self, name: &str) -> Result<Vec<String>, WorldError> {
        let region = self
            .get(name)
            .ok_or_else(|| WorldError::UnknownRegion(name.to_owned()))?;
        Ok(region
            .neighbors()
            .iter()
            .filter_map(|&pos| self.regions.get(pos))
            .map(|r| r.name().to_owned())
            .collect())
    }

    /// Set the infected compartment of the named region to `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownRegion`] if `name` is not in the graph.
    pub fn seed(&mut self, name: &str, amount: f64) -> Result<(), WorldError> {
        let region = self
            .get_mut(name)
            .ok_or_else(|| WorldError::UnknownRegion(name.to_owned()))?;
        region.seed(amount);
        Ok(())
    }

    /// Sum of every region's initial total population.
    pub fn initial_total(&self) -> f64 {
        self.regions.iter().map(Region::initial_total).sum()
    }
}
