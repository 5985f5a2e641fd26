//! Disease traits and the upgrade-point pool.
//!
//! A [`DiseaseTraits`] holds six trait levels and the point pool that buys
//! upgrades. It is a plain value: the session wraps it in a mutex so that an
//! upgrade's point deduction and level bump happen as one step, and so that
//! the growth timer and upgrade requests never race on `points`.

use contagion_types::{DiseaseStatus, DiseaseTrait, TraitLevels};

/// The player's disease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseTraits {
    name: String,
    levels: TraitLevels,
    points: u32,
    growth_enabled: bool,
}

impl DiseaseTraits {
    /// Create a disease with every trait at level 1.
    pub fn new(name: &str, initial_points: u32) -> Self {
        Self {
            name: name.to_owned(),
            levels: TraitLevels::INITIAL,
            points: initial_points,
            growth_enabled: false,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of all six levels.
    pub const fn levels(&self) -> TraitLevels {
        self.levels
    }

    /// Level of a single trait.
    pub const fn level(&self, which: DiseaseTrait) -> u32 {
        self.levels.get(which)
    }

    /// Unspent upgrade points.
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Whether points currently accrue over time.
    pub const fn growth_enabled(&self) -> bool {
        self.growth_enabled
    }

    /// Spend one point to raise `which` by one level.
    ///
    /// Returns `false` and changes nothing when no point is available or
    /// the level is already at its ceiling.
    pub fn increase(&mut self, which: DiseaseTrait) -> bool {
        let Some(remaining) = self.points.checked_sub(1) else {
            return false;
        };
        let level = self.levels.get_mut(which);
        let Some(raised) = level.checked_add(1) else {
            return false;
        };
        *level = raised;
        self.points = remaining;
        true
    }

    /// Adjust the point pool by `delta`.
    ///
    /// The pool saturates at zero and at `u32::MAX` rather than wrapping.
    pub const fn add_points(&mut self, delta: i32) {
        self.points = self.points.saturating_add_signed(delta);
    }

    /// Enable automatic point growth.
    pub const fn start_growth(&mut self) {
        self.growth_enabled = true;
    }

    /// Disable automatic point growth.
    pub const fn stop_growth(&mut self) {
        self.growth_enabled = false;
    }

    /// One growth timer firing: a point is granted only while growth is
    /// enabled. Returns whether a point was granted.
    pub const fn grow(&mut self) -> bool {
        if self.growth_enabled {
            self.points = self.points.saturating_add(1);
        }
        self.growth_enabled
    }

    /// Read-only view for the presentation layer.
    pub fn status(&self) -> DiseaseStatus {
        DiseaseStatus {
            name: self.name.clone(),
            levels: self.levels,
            points: self.points,
            growth_enabled: self.growth_enabled,
        }
    }
}

impl Default for DiseaseTraits {
    fn default() -> Self {
        Self::new("COVID-24", 0)
    }
}
