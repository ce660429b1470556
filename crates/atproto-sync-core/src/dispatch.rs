//! Panic-isolated fan-out from the ingress loop to user callbacks.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::error;

/// The per-connection flow-credit pool.
///
/// Sized from [`crate::EngineConfig::flow_credit_count`]. The engine holds
/// this pool and acquires a permit itself before reading each frame off the
/// socket, then hands the permit into
/// [`StreamAdapter::handle_frame`](crate::StreamAdapter::handle_frame). An
/// adapter that dispatches an event passes the permit on to
/// [`spawn_dispatch`] so it isn't released until the user's callback
/// finishes; a slow consumer backs up ingress itself rather than the engine
/// queuing frames up unboundedly.
#[derive(Debug, Clone)]
pub struct FlowCredit(Arc<Semaphore>);

impl FlowCredit {
    /// Creates a pool with `credit` permits available.
    pub fn new(credit: u32) -> Self {
        Self(Arc::new(Semaphore::new(credit as usize)))
    }

    /// Waits for a permit to become available.
    ///
    /// The semaphore backing this pool is never closed for the life of a
    /// connection, so this only ever resolves to a permit.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.0
            .clone()
            .acquire_owned()
            .await
            .expect("flow-credit semaphore is never closed")
    }
}

/// Spawns `fut` on the current runtime, holding `permit` until it completes
/// (the flow-credit mechanism: the permit isn't released back to the
/// semaphore until the user's callback has actually finished, so a slow
/// consumer throttles the ingress loop rather than building an unbounded
/// backlog of in-flight events).
///
/// A panic inside `fut` is caught and logged rather than taking down the
/// engine; callbacks are user code and shouldn't be able to crash the
/// stream they're consuming.
pub fn spawn_dispatch<F>(permit: OwnedSemaphorePermit, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let result = AssertUnwindSafe(fut).catch_unwind().await;
        if let Err(panic) = result {
            let message = panic_message(&panic);
            error!(panic = %message, "event callback panicked");
        }
        drop(permit);
    });
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
