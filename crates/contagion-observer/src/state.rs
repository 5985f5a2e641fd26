//! Shared application state for the Observer API server.

use std::sync::Arc;

use contagion_core::session::Session;
use contagion_types::TickBroadcast;
use tokio::sync::broadcast;

/// State handed to every handler.
///
/// A thin wrapper over the live session; the session's own locks keep
/// reads consistent with the tick cycle.
#[derive(Debug, Clone)]
pub struct AppState {
    session: Arc<Session>,
}

impl AppState {
    /// Wrap a session for serving.
    pub const fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// The served session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Subscribe to tick broadcasts.
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.session.subscribe()
    }
}
