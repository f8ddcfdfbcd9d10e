use std::sync::Arc;
use tokio::sync::watch;

/// One-shot readiness latch of a [`crate::FlagSource`].
///
/// Once [`ReadySignal::resolve`] was called the signal stays resolved, and every
/// later [`ReadySignal::wait`] returns immediately. Clones share the same latch.
#[derive(Clone, Debug)]
pub struct ReadySignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ReadySignal {
    /// Creates an unresolved signal.
    pub fn pending() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a signal that is already resolved.
    pub fn resolved() -> Self {
        let signal = Self::pending();
        signal.resolve();
        signal
    }

    /// Resolves the signal. Calling it again has no effect.
    pub fn resolve(&self) {
        self.sender.send_if_modified(|ready| {
            if *ready {
                return false;
            }
            *ready = true;
            true
        });
    }

    /// Returns `true` once the signal was resolved.
    pub fn is_ready(&self) -> bool {
        *self.sender.borrow()
    }

    /// Waits until the signal is resolved.
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting.
        _ = receiver.wait_for(|ready| *ready).await;
    }
}
