//! Engine binary for the Contagion simulation.
//!
//! Wires the session, its background tasks, and the observer together and
//! runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$CONTAGION_CONFIG` or `contagion-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the region graph from the configured file or the built-in world
//! 4. Create the session and seed the starting region
//! 5. Start point growth
//! 6. Spawn the clock and growth tasks
//! 7. Start the Observer API server
//! 8. Log world rates periodically until `Ctrl-C`
//! 9. Stop the session, join every task, log the final summary

mod error;
mod reporter;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use contagion_core::config::{SimulationConfig, WorldConfig};
use contagion_core::runner;
use contagion_core::session::Session;
use contagion_observer::{AppState, ServerConfig};
use contagion_world::{RegionGraph, default_records, load_records};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "CONTAGION_CONFIG";
/// Configuration file used when the variable is unset.
const DEFAULT_CONFIG_PATH: &str = "contagion-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any startup step fails or a task cannot be joined.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so the outcome is
    //    reported right after the subscriber is installed.
    let config_path = config_path();
    let loaded = load_config(&config_path);

    // 2. Initialize structured logging.
    let (level, json) = loaded.as_ref().map_or(("info", false), |(config, _)| {
        (config.logging.level.as_str(), config.logging.json)
    });
    init_tracing(level, json);

    let (config, from_file) = loaded?;
    info!(
        path = %config_path.display(),
        from_file,
        disease = %config.disease.name,
        tick_interval_ms = config.clock.tick_interval_ms,
        seed = config.clock.seed,
        "Configuration loaded"
    );

    // 3. Build the region graph.
    let graph = build_graph(&config.world)?;
    info!(regions = graph.len(), "Region graph built");

    // 4. Create the session and seed the starting region.
    let today = chrono::Local::now().date_naive();
    let session = Arc::new(Session::new(&config, graph, today));
    let seeded = match &config.world.starting_region {
        Some(region) => session.seed_infection(region).await,
        None => Ok(()),
    };
    if let Err(e) = seeded {
        warn!(error = %e, "Starting region not seeded");
    }

    // 5. Start point growth.
    session.start_growth().await;

    // 6. Spawn the clock and growth tasks.
    let ctx = runner::build_context(&config)?;
    let tasks = runner::start(&session, ctx, runner::seeded_source(config.clock.seed))?;

    // 7. Start the Observer API server.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let observer = if config.observer.enabled {
        let server_config = ServerConfig {
            host: config.observer.host.clone(),
            port: config.observer.port,
        };
        let state = Arc::new(AppState::new(Arc::clone(&session)));
        Some(tokio::spawn(async move {
            contagion_observer::start_server(&server_config, state, async move {
                let _ = shutdown_rx.await;
            })
            .await
        }))
    } else {
        info!("Observer disabled");
        None
    };

    // 8. Report until Ctrl-C.
    let reporter = reporter::spawn_reporter(
        Arc::clone(&session),
        Duration::from_secs(config.logging.report_interval_secs),
    );
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received, shutting down");

    // 9. Stop and join.
    session.stop()?;
    let _ = shutdown_tx.send(());

    let ticks = join("clock", tasks.clock).await?;
    let points = join("growth", tasks.growth).await?;
    let _ = join("reporter", reporter).await?;
    if let Some(handle) = observer {
        join("observer", handle).await??;
    }

    reporter::log_rates(session.tick(), &session.world_rates().await);
    let status = session.disease_status().await;
    info!(
        ticks,
        points_granted = points,
        points_left = status.points,
        levels = ?status.levels,
        last_tick = ?session.last_summary().await.map(|s| s.tick),
        "contagion-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Build the region graph from the configured file, or the built-in world.
fn build_graph(world: &WorldConfig) -> Result<RegionGraph, EngineError> {
    let records = match &world.regions_file {
        Some(path) => load_records(Path::new(path))?,
        None => default_records(),
    };
    Ok(RegionGraph::from_records(records, &world.aggregate_name)?)
}

async fn join<T>(name: &str, handle: tokio::task::JoinHandle<T>) -> Result<T, EngineError> {
    handle.await.map_err(|e| EngineError::Task {
        message: format!("{name} task failed: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_uses_defaults() {
        let (config, from_file) = load_config(Path::new("does/not/exist.yaml")).unwrap();
        assert!(!from_file);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn built_in_world_without_regions_file() {
        let graph = build_graph(&WorldConfig::default()).unwrap();
        assert_eq!(graph.len(), 6);
        assert!(graph.get("World").is_none());
    }

    #[test]
    fn unreadable_regions_file_is_a_world_error() {
        let world = WorldConfig {
            regions_file: Some(String::from("does/not/exist.yaml")),
            ..WorldConfig::default()
        };
        assert!(matches!(build_graph(&world), Err(EngineError::World { .. })));
    }
}
