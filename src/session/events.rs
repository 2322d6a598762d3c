//! In-process session event bus.
//!
//! Decouples the refresh scheduler, the HTTP client's 401 path, and any
//! embedder-side consumers (e.g. routing to a sign-in screen). Delivery is
//! best-effort: a lagging subscriber drops old events and resynchronizes.

use tokio::sync::broadcast;

/// Session lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A replacement token was stored; consumers may re-read it and the
    /// scheduler rearms.
    TokenRefreshed,
    /// The session is invalid; consumers should force a new sign-in.
    Unauthenticated,
    /// The stored token was replaced outside this manager (another process
    /// or an embedder wrote to the store). The scheduler rearms.
    TokenChangedExternally,
}

/// Broadcast handle for session events. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to all events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers. A send with no subscribers
    /// is not an error.
    pub fn emit(&self, event: SessionEvent) {
        tracing::debug!(?event, "session event");
        let _ = self.tx.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
