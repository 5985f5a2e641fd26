//! Error types for the `contagion-world` crate.

use std::path::PathBuf;

/// Errors that can occur while building or querying the region graph.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No region with this name exists.
    #[error("no such region: {0}")]
    UnknownRegion(String),

    /// Two reference records share a name.
    #[error("duplicate region name: {0}")]
    DuplicateRegion(String),

    /// A region lists a neighbor that is not part of the graph.
    #[error("region {region} lists unknown neighbor {neighbor}")]
    UnknownNeighbor {
        /// The region declaring the neighbor.
        region: String,
        /// The unresolved neighbor name.
        neighbor: String,
    },

    /// A region's area is zero, negative, or not a finite number.
    #[error("region {region} has invalid area {area}")]
    InvalidArea {
        /// The offending region.
        region: String,
        /// The rejected area value.
        area: f64,
    },

    /// A region's population is negative or not a finite number.
    #[error("region {region} has invalid population {population}")]
    InvalidPopulation {
        /// The offending region.
        region: String,
        /// The rejected population value.
        population: f64,
    },

    /// A region's temperature is not a finite number.
    #[error("region {region} has invalid temperature {temperature}")]
    InvalidTemperature {
        /// The offending region.
        region: String,
        /// The rejected temperature value.
        temperature: f64,
    },

    /// No simulated regions remain once the aggregate entry is removed.
    #[error("region graph is empty")]
    EmptyGraph,

    /// The reference data file could not be read.
    #[error("failed to read world data from {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The reference data is not valid YAML for [`WorldData`](crate::WorldData).
    #[error("failed to parse world data: {0}")]
    Yaml(#[from] serde_yml::Error),
}
