//! Observer registry and best-effort fan-out.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Identifier assigned to a connected observer.
pub type ObserverId = u64;

/// Registry of connected push-feed observers.
///
/// Each observer owns a bounded delivery queue; no two observers share
/// one. `broadcast` performs a non-blocking enqueue to every queue under
/// the registry lock, so a slow or dead observer never stalls the producer
/// or its peers. The lock is never held across I/O.
#[derive(Debug)]
pub struct ObserverRegistry {
    inner: Mutex<RegistryInner>,
    queue_capacity: usize,
}

#[derive(Debug, Default)]
struct RegistryInner {
    observers: HashMap<ObserverId, mpsc::Sender<String>>,
    next_id: ObserverId,
}

impl ObserverRegistry {
    /// Create an empty registry with the given per-observer queue capacity.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a new observer and hand back its delivery queue.
    pub fn register(&self) -> (ObserverId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.observers.insert(id, tx);
        debug!(
            observer = id,
            observers = inner.observers.len(),
            "Observer registered"
        );
        (id, rx)
    }

    /// Remove an observer. Removing an unknown id is a no-op, so
    /// disconnect-driven and shutdown-driven cleanup can race safely.
    pub fn deregister(&self, id: ObserverId) {
        let mut inner = self.inner.lock();
        if inner.observers.remove(&id).is_some() {
            debug!(
                observer = id,
                observers = inner.observers.len(),
                "Observer deregistered"
            );
        }
    }

    /// Fan a pre-serialized payload out to every registered observer.
    ///
    /// Enqueueing never blocks: an observer whose queue is full misses this
    /// payload and stays registered. Returns the number of queues the
    /// payload was delivered to.
    pub fn broadcast(&self, payload: &str) -> usize {
        let inner = self.inner.lock();
        let mut delivered = 0;
        for (id, tx) in &inner.observers {
            match tx.try_send(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    trace!(observer = id, "Observer queue full, payload dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    trace!(observer = id, "Observer queue closed, payload dropped");
                }
            }
        }
        delivered
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }

    /// Drop every delivery queue, ending all observer streams.
    pub fn close_all(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.observers.len();
        inner.observers.clear();
        if dropped > 0 {
            debug!(observers = dropped, "Observer registry cleared");
        }
    }
}
