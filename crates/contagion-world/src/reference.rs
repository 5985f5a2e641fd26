//! Reference world data.
//!
//! Region reference data is a YAML document with a `regions:` list. Each
//! record carries the population (millions), area (km²), mean temperature
//! (°C), and neighbor names. An aggregate row (conventionally `World`) may
//! be present; [`RegionGraph::from_records`] drops it.
//!
//! ```yaml
//! regions:
//!   - name: Europe
//!     population: 747.0
//!     area: 10180000.0
//!     temperature: 9.0
//!     neighbors: [Africa, Asia, North America]
//! ```
//!
//! [`default_world`] builds the graph from the built-in six-continent data
//! set for runs without a data file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WorldError;
use crate::graph::RegionGraph;

/// Name of the aggregate row in the built-in data.
pub const DEFAULT_AGGREGATE: &str = "World";

/// One region as it appears in reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Unique region name.
    pub name: String,
    /// Initial healthy population, in millions.
    pub population: f64,
    /// Area in km².
    pub area: f64,
    /// Mean temperature in °C.
    pub temperature: f64,
    /// Names of adjacent regions.
    #[serde(default)]
    pub neighbors: Vec<String>,
}

impl RegionRecord {
    /// Check the scalar fields of this record.
    ///
    /// # Errors
    ///
    /// Returns the matching [`WorldError`] variant for a non-positive or
    /// non-finite area, a negative or non-finite population, or a non-finite
    /// temperature.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(WorldError::InvalidArea {
                region: self.name.clone(),
                area: self.area,
            });
        }
        if !self.population.is_finite() || self.population < 0.0 {
            return Err(WorldError::InvalidPopulation {
                region: self.name.clone(),
                population: self.population,
            });
        }
        if !self.temperature.is_finite() {
            return Err(WorldError::InvalidTemperature {
                region: self.name.clone(),
                temperature: self.temperature,
            });
        }
        Ok(())
    }
}

/// Top-level shape of a world data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    /// Every region record, aggregate row included.
    #[serde(default)]
    pub regions: Vec<RegionRecord>,
}

/// Parse region records from a YAML string.
///
/// # Errors
///
/// Returns [`WorldError::Yaml`] if the document does not match [`WorldData`].
pub fn parse_records(yaml: &str) -> Result<Vec<RegionRecord>, WorldError> {
    let data: WorldData = serde_yml::from_str(yaml)?;
    Ok(data.regions)
}

/// Read and parse region records from a YAML file.
///
/// # Errors
///
/// Returns [`WorldError::Io`] if the file cannot be read, or
/// [`WorldError::Yaml`] if it cannot be parsed.
pub fn load_records(path: &Path) -> Result<Vec<RegionRecord>, WorldError> {
    let contents = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&contents)?;
    info!(path = %path.display(), records = records.len(), "Loaded world data");
    Ok(records)
}

fn record(name: &str, population: f64, area: f64, temperature: f64, neighbors: &[&str]) -> RegionRecord {
    RegionRecord {
        name: name.to_owned(),
        population,
        area,
        temperature,
        neighbors: neighbors.iter().map(|&n| n.to_owned()).collect(),
    }
}

/// The built-in reference data: six inhabited continents plus the `World`
/// aggregate row.
pub fn default_records() -> Vec<RegionRecord> {
    vec![
        record(
            "Africa",
            1_340.0,
            30_370_000.0,
            25.0,
            &["Europe", "Asia", "South America"],
        ),
        record(
            "Asia",
            4_641.0,
            44_579_000.0,
            12.0,
            &["Africa", "Europe", "Oceania", "North America"],
        ),
        record(
            "Europe",
            747.0,
            10_180_000.0,
            9.0,
            &["Africa", "Asia", "North America"],
        ),
        record(
            "North America",
            592.0,
            24_709_000.0,
            11.0,
            &["South America", "Europe", "Asia"],
        ),
        record(
            "South America",
            430.0,
            17_840_000.0,
            22.0,
            &["North America", "Africa", "Oceania"],
        ),
        record(
            "Oceania",
            43.0,
            8_526_000.0,
            22.0,
            &["Asia", "South America"],
        ),
        record(
            DEFAULT_AGGREGATE,
            7_793.0,
            136_204_000.0,
            15.0,
            &["Africa", "Asia", "Europe", "North America", "South America", "Oceania"],
        ),
    ]
}

/// Build the region graph from the built-in reference data.
///
/// # Errors
///
/// Returns [`WorldError`] if graph construction fails (does not happen with
/// the hard-coded data).
pub fn default_world() -> Result<RegionGraph, WorldError> {
    RegionGraph::from_records(default_records(), DEFAULT_AGGREGATE)
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_world_has_six_continents() {
        let world = default_world();
        assert!(world.is_ok());
        if let Ok(graph) = world {
            assert_eq!(graph.len(), 6);
            assert!(graph.get(DEFAULT_AGGREGATE).is_none());
            assert_eq!(graph.names().first().map(String::as_str), Some("Africa"));
        }
    }

    #[test]
    fn default_world_adjacency_is_symmetric() {
        let graph = default_world().unwrap();
        for region in graph.iter() {
            let neighbors = graph.neighbor_names(region.name()).unwrap();
            assert!(!neighbors.is_empty(), "{} has no neighbors", region.name());
            for neighbor in neighbors {
                let back = graph.neighbor_names(&neighbor).unwrap();
                assert!(
                    back.iter().any(|n| n == region.name()),
                    "{neighbor} does not list {}",
                    region.name()
                );
            }
        }
    }

    #[test]
    fn default_regions_start_healthy() {
        let graph = default_world().unwrap();
        for region in graph.iter() {
            assert_eq!(region.compartments.infected, 0.0);
            assert_eq!(region.compartments.healthy, region.initial_total());
            assert!(region.area() > 0.0);
        }
    }

    #[test]
    fn parse_yaml_records() {
        let yaml = "\
regions:
  - name: North
    population: 5.5
    area: 20.0
    temperature: -3.0
    neighbors: [South]
  - name: South
    population: 2.0
    area: 10.0
    temperature: 28.0
";
        let records = parse_records(yaml);
        assert!(records.is_ok());
        let records = records.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.first().map(|r| r.temperature), Some(-3.0));
        assert_eq!(records.get(1).map(|r| r.neighbors.len()), Some(0));

        let graph = RegionGraph::from_records(records, DEFAULT_AGGREGATE);
        assert!(graph.is_ok());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let result = parse_records("regions: [ { name: X, population: lots } ]");
        assert!(matches!(result, Err(WorldError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_records(Path::new("/definitely/not/here/world.yaml"));
        assert!(matches!(result, Err(WorldError::Io { .. })));
    }

    #[test]
    fn negative_population_rejected() {
        let r = record("X", -1.0, 1.0, 0.0, &[]);
        assert!(matches!(r.validate(), Err(WorldError::InvalidPopulation { .. })));
    }

    #[test]
    fn shipped_world_file_matches_built_in_data() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data")
            .join("world.yaml");
        if !path.exists() {
            return;
        }
        let from_file = load_records(&path)
            .and_then(|records| RegionGraph::from_records(records, DEFAULT_AGGREGATE));
        assert!(from_file.is_ok(), "Failed to load world file: {from_file:?}");
        let (Ok(from_file), Ok(built_in)) = (from_file, default_world()) else {
            return;
        };
        assert_eq!(from_file.names(), built_in.names());
        for name in built_in.names() {
            assert_eq!(from_file.neighbor_names(&name).ok(), built_in.neighbor_names(&name).ok());
            assert_eq!(
                from_file.get(&name).map(|r| r.compartments),
                built_in.get(&name).map(|r| r.compartments)
            );
        }
    }
}
