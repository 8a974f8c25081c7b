//! Producer-facing ingestion pipeline.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use gauntlet_core::{ChallengeEvent, DashboardData, EventCollector};

use crate::registry::ObserverRegistry;

/// Entry point the challenge producer emits events through.
///
/// Each event is appended to the log, folded into the live aggregate, and
/// fanned out to connected observers. Emission never blocks on network
/// I/O; the aggregate lock and the registry lock are taken one after the
/// other, never nested.
#[derive(Clone)]
pub struct ProgressSink {
    collector: Arc<EventCollector>,
    dashboard: Arc<RwLock<DashboardData>>,
    registry: Arc<ObserverRegistry>,
}

impl ProgressSink {
    pub(crate) fn new(
        collector: Arc<EventCollector>,
        dashboard: Arc<RwLock<DashboardData>>,
        registry: Arc<ObserverRegistry>,
    ) -> Self {
        Self {
            collector,
            dashboard,
            registry,
        }
    }

    /// Record one event and push it to all connected observers.
    ///
    /// A serialization failure skips the push for this event only; the log
    /// and the aggregate are already updated and the server keeps running.
    pub fn emit(&self, event: ChallengeEvent) {
        self.collector.emit(event.clone());
        self.dashboard.write().update_from_event(&event);

        match serde_json::to_string(&event) {
            Ok(payload) => {
                self.registry.broadcast(&payload);
            }
            Err(error) => {
                warn!(
                    %error,
                    challenge = %event.challenge_id,
                    "Failed to serialize event, skipping broadcast"
                );
            }
        }
    }

    /// Overwrite the coarse run-level status shown on the dashboard.
    pub fn set_run_status(&self, status: impl Into<String>) {
        self.dashboard.write().status = status.into();
    }

    /// Current aggregate, cloned under the read lock.
    pub fn dashboard(&self) -> DashboardData {
        self.dashboard.read().clone()
    }
}
