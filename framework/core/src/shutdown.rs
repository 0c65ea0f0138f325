use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::{Receiver, Sender};

/// Broadcasts a one-shot shutdown signal to every worker of a sweep.
///
/// Cloning the handle is cheap; each worker gets its own listener via
/// [`ShutdownHandle::new_listener`]. Workers only ever poll between jobs,
/// so an in-flight simulator run is never interrupted.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.sender.send(()) {
            // Fails when no listener is registered, which just means there
            // is nothing left to stop.
            log::warn!("Failed to send shutdown signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct DelegatedShutdownListener {
    receiver: Arc<Mutex<Receiver<()>>>,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Point in time check for the shutdown signal.
    pub fn should_shutdown(&mut self) -> bool {
        match self.receiver.lock() {
            Ok(mut guard) => {
                match guard.try_recv() {
                    Ok(_) => true,
                    Err(tokio::sync::broadcast::error::TryRecvError::Closed) => true,
                    // Empty or lagged means no signal yet.
                    Err(_) => false,
                }
            }
            Err(_) => false,
        }
    }
}
