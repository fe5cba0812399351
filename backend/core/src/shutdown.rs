use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Trigger side of the run-wide cancellation signal.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

/// Receiver side, cloned into every document and attachment task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
    /// Held only by [`Shutdown::never`] so the channel stays open.
    _keepalive: Option<Arc<watch::Sender<bool>>>,
}

impl ShutdownHandle {
    pub fn new() -> (Self, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, Shutdown { rx, _keepalive: None })
    }

    /// Ask every running task to stop. Idempotent.
    pub fn trigger(&self) {
        if !*self.tx.borrow() {
            info!("Shutdown requested");
        }
        let _ = self.tx.send(true);
    }
}

impl Shutdown {
    /// A signal that never fires, for callers without a shutdown source.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { rx, _keepalive: Some(Arc::new(tx)) }
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been requested.
    ///
    /// If the handle is dropped without triggering, this never resolves.
    pub async fn triggered(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
