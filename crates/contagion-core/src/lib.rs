//! Disease model, integration, propagation, and session orchestration for
//! the Contagion outbreak simulation.
//!
//! Each tick runs one Euler pass over every region using the current trait
//! levels, and every fourth tick additionally lets heavily infected regions
//! seed their neighbors. A [`Session`] owns the shared state; the
//! [`runner`] drives it with two independent background tasks.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and propagation schedule.
//! - [`config`] -- Configuration loading from `contagion-config.yaml` into
//!   strongly-typed structs.
//! - [`disease`] -- [`DiseaseTraits`]: trait levels and the point pool.
//! - [`integrator`] -- The fixed-step Euler pass.
//! - [`news`] -- Calendar cursor and headline ticker.
//! - [`propagation`] -- Cross-region seeding with an injectable
//!   [`SeedingSource`].
//! - [`runner`] -- Clock and growth loops.
//! - [`session`] -- Shared state and the presentation-facing API.
//! - [`stats`] -- Rates, colors, and stats lines for display.
//! - [`tick`] -- One tick: integrate, then propagate when due.
//!
//! [`DiseaseTraits`]: disease::DiseaseTraits
//! [`SeedingSource`]: propagation::SeedingSource
//! [`Session`]: session::Session

pub mod clock;
pub mod config;
pub mod disease;
pub mod integrator;
pub mod news;
pub mod propagation;
pub mod runner;
pub mod session;
pub mod stats;
pub mod tick;
