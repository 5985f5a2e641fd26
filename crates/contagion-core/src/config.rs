//! Configuration loading and typed config structures for the Contagion
//! simulation.
//!
//! The canonical configuration lives in `contagion-config.yaml` at the
//! project root. Every section carries `#[serde(default)]`, so an empty file
//! yields the stock game settings.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What was wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `contagion-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Disease identity and point growth.
    #[serde(default)]
    pub disease: DiseaseConfig,

    /// Tick cadence and propagation schedule.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Euler pass parameters.
    #[serde(default)]
    pub integrator: IntegratorConfig,

    /// Cross-region seeding rule.
    #[serde(default)]
    pub propagation: PropagationConfig,

    /// Reference data source.
    #[serde(default)]
    pub world: WorldConfig,

    /// Date cursor and headline ticker.
    #[serde(default)]
    pub news: NewsConfig,

    /// HTTP observer.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };
        if !self.integrator.dt.is_finite() || self.integrator.dt <= 0.0 {
            return invalid("integrator.dt must be a positive number");
        }
        if self.integrator.steps_per_tick == 0 {
            return invalid("integrator.steps_per_tick must be at least 1");
        }
        if self.clock.tick_interval_ms == 0 {
            return invalid("clock.tick_interval_ms must be at least 1");
        }
        if self.clock.propagation_every == 0 {
            return invalid("clock.propagation_every must be at least 1");
        }
        if self.disease.growth_interval_secs == 0 {
            return invalid("disease.growth_interval_secs must be at least 1");
        }
        if self.propagation.self_seed_sides == 0 {
            return invalid("propagation.self_seed_sides must be at least 1");
        }
        if !self.propagation.seed_amount.is_finite() || self.propagation.seed_amount < 0.0 {
            return invalid("propagation.seed_amount must be a non-negative number");
        }
        if !self.propagation.infection_threshold.is_finite()
            || self.propagation.infection_threshold < 0.0
        {
            return invalid("propagation.infection_threshold must be a non-negative number");
        }
        Ok(())
    }
}

/// Disease identity and upgrade-point growth.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiseaseConfig {
    /// Display name chosen at session creation.
    #[serde(default = "default_disease_name")]
    pub name: String,

    /// Upgrade points available at session start.
    #[serde(default)]
    pub initial_points: u32,

    /// Seconds between automatic point grants while growth is enabled.
    #[serde(default = "default_growth_interval_secs")]
    pub growth_interval_secs: u64,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            name: default_disease_name(),
            initial_points: 0,
            growth_interval_secs: default_growth_interval_secs(),
        }
    }
}

/// Tick cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Propagation runs on every tick number divisible by this.
    #[serde(default = "default_propagation_every")]
    pub propagation_every: u64,

    /// Seed for the propagation random source.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            propagation_every: default_propagation_every(),
            seed: default_seed(),
        }
    }
}

/// Euler pass parameters.
///
/// The stock values reproduce the reference model: ten time units per tick
/// at `dt = 0.1`, with removal and mortality scaled down by `1e-6` while
/// transmission is left unscaled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntegratorConfig {
    /// Sub-step size.
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// Sub-steps per tick.
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: u32,

    /// Limit each sub-step's flows so no compartment goes negative.
    #[serde(default = "default_true")]
    pub clamp_non_negative: bool,

    /// Multiplier on the transmission coefficient.
    #[serde(default = "default_beta_scale")]
    pub beta_scale: f64,

    /// Multiplier on the removal coefficient.
    #[serde(default = "default_rate_scale")]
    pub removal_scale: f64,

    /// Multiplier on the mortality coefficient.
    #[serde(default = "default_rate_scale")]
    pub mortality_scale: f64,

    /// Regions strictly below this temperature use cold resistance.
    #[serde(default = "default_cold_threshold_c")]
    pub cold_threshold_c: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            steps_per_tick: default_steps_per_tick(),
            clamp_non_negative: true,
            beta_scale: default_beta_scale(),
            removal_scale: default_rate_scale(),
            mortality_scale: default_rate_scale(),
            cold_threshold_c: default_cold_threshold_c(),
        }
    }
}

/// Cross-region seeding rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropagationConfig {
    /// Infected share of the initial population a region needs before it
    /// can spread.
    #[serde(default = "default_infection_threshold")]
    pub infection_threshold: f64,

    /// Infected amount written into a newly seeded region.
    #[serde(default = "default_seed_amount")]
    pub seed_amount: f64,

    /// Number of faces on the self-seeding die.
    #[serde(default = "default_self_seed_sides")]
    pub self_seed_sides: u32,

    /// Die face that triggers self-seeding.
    #[serde(default = "default_self_seed_sentinel")]
    pub self_seed_sentinel: u32,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            infection_threshold: default_infection_threshold(),
            seed_amount: default_seed_amount(),
            self_seed_sides: default_self_seed_sides(),
            self_seed_sentinel: default_self_seed_sentinel(),
        }
    }
}

/// Reference data source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// YAML region file. The built-in world is used when absent.
    #[serde(default)]
    pub regions_file: Option<String>,

    /// Region seeded once at startup.
    #[serde(default)]
    pub starting_region: Option<String>,

    /// Name of the aggregate row dropped from the data.
    #[serde(default = "default_aggregate_name")]
    pub aggregate_name: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            regions_file: None,
            starting_region: None,
            aggregate_name: default_aggregate_name(),
        }
    }
}

/// Date cursor and headline ticker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsConfig {
    /// First date returned by the cursor. Defaults to today's month and
    /// day in 1960.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Headlines loaded at start.
    #[serde(default)]
    pub headlines: Vec<String>,

    /// Maximum headlines held by the ticker.
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            headlines: Vec::new(),
            max_headlines: default_max_headlines(),
        }
    }
}

/// HTTP observer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_observer_port")]
    pub port: u16,

    /// Whether the observer is started at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
            enabled: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Seconds between world-rate reports from the engine binary.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            report_interval_secs: default_report_interval_secs(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_disease_name() -> String {
    "COVID-24".to_owned()
}

const fn default_growth_interval_secs() -> u64 {
    10
}

const fn default_tick_interval_ms() -> u64 {
    240
}

const fn default_propagation_every() -> u64 {
    4
}

const fn default_seed() -> u64 {
    42
}

const fn default_dt() -> f64 {
    0.1
}

const fn default_steps_per_tick() -> u32 {
    100
}

const fn default_beta_scale() -> f64 {
    1.0
}

const fn default_rate_scale() -> f64 {
    1e-6
}

const fn default_cold_threshold_c() -> f64 {
    20.0
}

const fn default_infection_threshold() -> f64 {
    0.10
}

const fn default_seed_amount() -> f64 {
    0.01
}

const fn default_self_seed_sides() -> u32 {
    100
}

const fn default_self_seed_sentinel() -> u32 {
    1
}

fn default_aggregate_name() -> String {
    "World".to_owned()
}

const fn default_max_headlines() -> usize {
    4
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_report_interval_secs() -> u64 {
    5
}

const fn default_true() -> bool {
    true
}
