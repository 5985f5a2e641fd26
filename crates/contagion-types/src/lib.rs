//! Shared type definitions for the Contagion outbreak simulation.
//!
//! This crate is the single source of truth for the value types that cross
//! crate boundaries: trait levels flowing into the integrator, compartment
//! values held by regions, and the read-only projections handed to the
//! presentation layer. Types are exported to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- The six upgradeable disease traits.
//! - [`structs`] -- Compartments, trait level snapshots, and display
//!   projections (region stats, world rates, colors, tick broadcasts,
//!   session status).

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DiseaseTrait, ParseTraitError};
pub use structs::{
    Compartments, DiseaseStatus, RegionColor, RegionStats, SessionStatus, TickBroadcast, TraitLevels,
    WorldRates,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the presentation layer.

    #[test]
    fn export_bindings() {
        // ts-rs writes the `.ts` files into `bindings/` relative to the
        // crate root when `export_all` runs.
        use ts_rs::TS;

        let _ = crate::enums::DiseaseTrait::export_all();

        let _ = crate::structs::TraitLevels::export_all();
        let _ = crate::structs::Compartments::export_all();
        let _ = crate::structs::RegionStats::export_all();
        let _ = crate::structs::RegionColor::export_all();
        let _ = crate::structs::WorldRates::export_all();
        let _ = crate::structs::DiseaseStatus::export_all();
        let _ = crate::structs::TickBroadcast::export_all();
        let _ = crate::structs::SessionStatus::export_all();
    }
}
