//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can abort startup or shutdown,
//! so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: contagion_core::config::ConfigError,
    },

    /// Clock settings were unusable.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: contagion_core::clock::ClockError,
    },

    /// Region data could not be loaded or linked.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: contagion_world::WorldError,
    },

    /// The session refused to start or stop.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: contagion_core::session::SessionError,
    },

    /// Observer API server failed.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: contagion_observer::ServerError,
    },

    /// A background task panicked or was aborted.
    #[error("task error: {message}")]
    Task {
        /// Description of the task failure.
        message: String,
    },

    /// Waiting for Ctrl-C failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
