//! Observable loading flag shared by all calls on one executor
use std::sync::Arc;

use tokio::sync::watch;

/// Boolean that reads `true` while a call is in flight.
///
/// Cloning yields another handle to the same flag. The flag is last-writer-wins:
/// with overlapping calls it returns to `false` as soon as any one of them finishes.
#[derive(Debug, Clone)]
pub struct Loading {
    tx: Arc<watch::Sender<bool>>,
}

impl Loading {
    /// A new flag, initially `false`
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Current value
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receiver notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub(crate) fn set(&self, value: bool) {
        self.tx.send_replace(value);
    }

    /// Mark a call as started; the returned guard clears the flag when dropped.
    pub(crate) fn begin(&self) -> InFlight<'_> {
        self.set(true);
        InFlight { loading: self }
    }
}

impl Default for Loading {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the loading flag on every exit path, including drop of an unfinished call
pub(crate) struct InFlight<'a> {
    loading: &'a Loading,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.loading.set(false);
    }
}
