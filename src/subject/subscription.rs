use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Something a listener can be removed from.
pub(crate) trait Detach: Send + Sync {
    fn detach_listener(&self, listener_id: usize);
}

/// Disposable handle for a registered listener.
///
/// Disposal unregisters the listener exactly once; later calls are no-ops.
/// Dropping the handle disposes it as well, so keep it alive for as long as
/// the callback should run, or call [`detach`](Subscription::detach) to
/// leave the listener registered for the lifetime of its source.
#[must_use = "dropping a Subscription disposes it immediately"]
pub struct Subscription {
    listener_id: usize,
    disposed: Arc<AtomicBool>,
    source: Option<Weak<dyn Detach>>,
}

impl Subscription {
    pub(crate) fn new(
        listener_id: usize,
        disposed: Arc<AtomicBool>,
        source: Weak<dyn Detach>,
    ) -> Self {
        Self {
            listener_id,
            disposed,
            source: Some(source),
        }
    }

    /// Stop delivery to this listener.
    ///
    /// Safe to call any number of times, including after the source itself
    /// has been dropped.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(source) = self.source.as_ref().and_then(Weak::upgrade) {
            source.detach_listener(self.listener_id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Give up the handle without disposing the listener.
    pub fn detach(mut self) {
        self.source = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.source.is_some() {
            self.dispose();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener_id", &self.listener_id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
