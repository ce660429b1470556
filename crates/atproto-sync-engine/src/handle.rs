//! The caller-facing handle returned by [`crate::start`].

use std::sync::Arc;

use atproto_sync_core::InitError;
use tokio::sync::watch;

use crate::state::ConnectionState;

/// Handle to a running engine instance.
///
/// Dropping this handle does *not* stop the engine — call [`EngineHandle::stop`]
/// explicitly, the same way `ConnectionHandle::close` works in the transport
/// layer this engine is modeled on. This keeps a handle that's merely being
/// passed around (e.g. stored in a struct field) from silently tearing down
/// the stream.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
    state_rx: watch::Receiver<ConnectionState>,
    failure_rx: watch::Receiver<Option<InitError>>,
}

impl EngineHandle {
    pub(crate) fn new(
        shutdown_tx: watch::Sender<bool>,
        state_rx: watch::Receiver<ConnectionState>,
        failure_rx: watch::Receiver<Option<InitError>>,
    ) -> Self {
        Self { shutdown_tx: Arc::new(shutdown_tx), state_rx, failure_rx }
    }

    /// Signals the engine to stop. In-flight dispatch tasks are allowed to
    /// finish; no new connection attempt is made after the current one ends.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// The engine's current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// A receiver that resolves each time the connection state changes.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// The error that put the engine into [`ConnectionState::Failed`], if
    /// any. A transport that never managed to open (DNS failure, connection
    /// refused) lands here instead of being retried forever; `None` until
    /// that happens, and sticky afterward since the engine does not resume.
    pub fn failure(&self) -> Option<InitError> {
        self.failure_rx.borrow().clone()
    }

    /// A receiver that resolves once the engine records a fatal failure.
    pub fn failure_changes(&self) -> watch::Receiver<Option<InitError>> {
        self.failure_rx.clone()
    }
}
