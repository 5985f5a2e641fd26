//! Enumeration types for the Contagion simulation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One of the six upgradeable characteristics of the pathogen.
///
/// Every trait starts at level 1 and only ever increases. The integrator
/// reads the levels as static coefficients for the duration of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DiseaseTrait {
    /// Hides the disease from detection; slows recovery.
    Camouflage,
    /// Multiplies the transmission coefficient.
    Infectivity,
    /// Multiplies the mortality coefficient.
    Lethality,
    /// Genetic reassembly; slows recovery.
    Reassembly,
    /// Survival in regions at or above the cold threshold.
    HeatResistance,
    /// Survival in regions below the cold threshold.
    ColdResistance,
}

impl DiseaseTrait {
    /// All traits in their canonical order.
    pub const ALL: [Self; 6] = [
        Self::Camouflage,
        Self::Infectivity,
        Self::Lethality,
        Self::Reassembly,
        Self::HeatResistance,
        Self::ColdResistance,
    ];

    /// Stable `snake_case` identifier, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camouflage => "camouflage",
            Self::Infectivity => "infectivity",
            Self::Lethality => "lethality",
            Self::Reassembly => "reassembly",
            Self::HeatResistance => "heat_resistance",
            Self::ColdResistance => "cold_resistance",
        }
    }
}

impl core::fmt::Display for DiseaseTrait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`DiseaseTrait`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disease trait: {0}")]
pub struct ParseTraitError(pub String);

impl FromStr for DiseaseTrait {
    type Err = ParseTraitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTraitError(s.to_owned()))
    }
}
