//! Simulation clock: tick counter and propagation schedule.
//!
//! The clock is the single source of truth for which tick is running.
//! Propagation is derived from the tick number (every `propagation_every`
//! ticks, counting from the first), never tracked separately.

use std::time::Duration;

use crate::config::ClockConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid clock configuration (e.g. zero interval).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    /// Number of completed ticks. Zero before the first tick.
    tick: u64,

    /// Propagation runs when `tick` is a multiple of this.
    propagation_every: u64,

    /// Real-time spacing between ticks.
    interval: Duration,
}

impl SimulationClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the interval or the
    /// propagation cadence is zero.
    pub fn new(config: &ClockConfig) -> Result<Self, ClockError> {
        Self::from_parts(
            0,
            config.propagation_every,
            Duration::from_millis(config.tick_interval_ms),
        )
    }

    /// Create a clock from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `interval` or
    /// `propagation_every` is zero.
    pub fn from_parts(
        tick: u64,
        propagation_every: u64,
        interval: Duration,
    ) -> Result<Self, ClockError> {
        if propagation_every == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "propagation_every must be at least 1".to_owned(),
            });
        }
        if interval.is_zero() {
            return Err(ClockError::InvalidConfig {
                reason: "tick interval must be non-zero".to_owned(),
            });
        }
        Ok(Self {
            tick,
            propagation_every,
            interval,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the current tick is a propagation tick.
    ///
    /// Tick 0 (nothing has run yet) never is.
    pub const fn propagation_due(&self) -> bool {
        self.tick > 0 && matches!(self.tick.checked_rem(self.propagation_every), Some(0))
    }

    /// Real-time spacing between ticks.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}
