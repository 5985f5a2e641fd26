//! A single simulated region.
//!
//! A [`Region`] pairs the mutable [`Compartments`] with the attributes that
//! are fixed at load time: area, temperature, adjacency, and the initial
//! total population used as the denominator for propagation and world
//! rates.

use contagion_types::Compartments;

/// One node of the region graph.
///
/// Neighbors are stored as indices into the owning
/// [`RegionGraph`](crate::RegionGraph), resolved once during construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    /// Current population compartments, in millions.
    pub compartments: Compartments,
    initial_total: f64,
    area: f64,
    temperature: f64,
    neighbors: Vec<usize>,
}

impl Region {
    /// Create a fully healthy region.
    pub(crate) fn new(
        name: String,
        population: f64,
        area: f64,
        temperature: f64,
        neighbors: Vec<usize>,
    ) -> Self {
        Self {
            name,
            compartments: Compartments::healthy(population),
            initial_total: population,
            area,
            temperature,
            neighbors,
        }
    }

    /// The unique region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total population captured at load time.
    pub const fn initial_total(&self) -> f64 {
        self.initial_total
    }

    /// Area in km².
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Mean temperature in °C.
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Graph indices of the adjacent regions.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Set the infected compartment to `amount`.
    ///
    /// Used for the external starting-region trigger and by propagation.
    /// The other compartments are left as they are, matching how seeding
    /// has always behaved: the seeded amount is added on top of the
    /// population rather than moved out of `healthy`.
    pub const fn seed(&mut self, amount: f64) {
        self.compartments.infected = amount;
    }

    /// Whether the infected compartment is exactly zero.
    pub fn is_uninfected(&self) -> bool {
        self.compartments.infected == 0.0
    }
}
