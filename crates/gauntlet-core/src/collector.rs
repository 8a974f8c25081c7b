//! Append-only event log.

use parking_lot::RwLock;

use crate::event::ChallengeEvent;

/// Thread-safe, append-only store of every event emitted during a run.
///
/// Insertion order is significant: replaying the log through the dashboard
/// aggregate must reproduce the live aggregate. Events are never removed or
/// mutated after append.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: RwLock<Vec<ChallengeEvent>>,
}

impl EventCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    ///
    /// Never fails; the write lock is held only for the push, so callers
    /// are not blocked beyond that bounded critical section.
    pub fn emit(&self, event: ChallengeEvent) {
        self.events.write().push(event);
    }

    /// Point-in-time copy of all events appended so far, in arrival order.
    ///
    /// Safe to call while `emit` continues concurrently; events appended
    /// after the call are not visible in the returned sequence.
    pub fn snapshot(&self) -> Vec<ChallengeEvent> {
        self.events.read().clone()
    }

    /// Number of events appended so far.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether no events have been appended yet.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::event::ChallengeEvent;

    #[test]
    fn test_emit_preserves_arrival_order() {
        let collector = EventCollector::new();
        collector.emit(ChallengeEvent::started("ch-1", "first"));
        collector.emit(ChallengeEvent::started("ch-2", "second"));
        collector.emit(ChallengeEvent::skipped("ch-3", "third"));

        let events = collector.snapshot();
        let ids: Vec<&str> = events.iter().map(|e| e.challenge_id.as_str()).collect();
        assert_eq!(ids, ["ch-1", "ch-2", "ch-3"]);
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let collector = EventCollector::new();
        collector.emit(ChallengeEvent::started("ch-1", "first"));

        let before = collector.snapshot();
        collector.emit(ChallengeEvent::started("ch-2", "second"));

        assert_eq!(before.len(), 1);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_concurrent_emit() {
        let collector = Arc::new(EventCollector::new());
        let mut handles = Vec::new();

        for t in 0..8 {
            let collector = collector.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let id = format!("ch-{t}-{i}");
                    collector.emit(ChallengeEvent::started(id, "load"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(collector.len(), 800);
    }
}
