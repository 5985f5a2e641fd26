//! Observer API server for the Contagion simulation.
//!
//! This crate provides an Axum HTTP server over a running
//! [`Session`](contagion_core::session::Session):
//!
//! - **REST endpoints** for the presentation layer: region stats, region
//!   names, map colors, world rates, the disease and its upgrades, growth
//!   toggles, the calendar, and the headline ticker
//! - **`WebSocket` endpoint** (`/ws/ticks`) streaming a
//!   [`TickBroadcast`](contagion_types::TickBroadcast) after every tick
//! - **Minimal HTML page** (`GET /`) with the current tick and world rates
//!
//! Every handler goes through the session's own locks, so a response
//! always reflects whole ticks.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
