//! Geography for the Contagion outbreak simulation.
//!
//! The world is a fixed set of named regions, each holding four population
//! compartments plus static area, temperature, and adjacency. The graph is
//! built once from reference data and never changes shape afterwards; only
//! compartment values move.
//!
//! # Modules
//!
//! - [`error`] -- Error types for graph construction and lookups.
//! - [`region`] -- [`Region`]: compartments plus the static attributes the
//!   integrator and propagator read.
//! - [`graph`] -- [`RegionGraph`]: name-keyed region store with stable
//!   iteration order and index-based adjacency.
//! - [`reference`] -- [`RegionRecord`] reference data, the YAML loader, and
//!   the built-in default world.

pub mod error;
pub mod graph;
pub mod reference;
pub mod region;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use graph::RegionGraph;
pub use reference::{
    DEFAULT_AGGREGATE, RegionRecord, WorldData, default_records, default_world, load_records,
    parse_records,
};
pub use region::Region;
