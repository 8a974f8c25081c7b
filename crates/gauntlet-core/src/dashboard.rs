//! Per-run dashboard aggregate.
//!
//! `DashboardData` is the derived view of the event stream: one status
//! record per challenge plus rollup counters. It is mutated through a
//! single entry point, `update_from_event`, and can be rebuilt from
//! scratch by replaying the event log — both paths must produce identical
//! state for the same event sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::collector::EventCollector;
use crate::event::{ChallengeEvent, EventKind};

/// Run label used for aggregates rebuilt from the event log.
pub const REPLAY_RUN_ID: &str = "replay";

/// Display status of a single challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeState {
    Running,
    Passed,
    Failed,
    Skipped,
    TimedOut,
}

/// Status record for one challenge, keyed by its id in the aggregate.
///
/// Later events for the same id overwrite the record: last-write-wins by
/// arrival order, not by event timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Human-readable label from the most recent event.
    pub name: String,
    /// Current display status.
    pub status: ChallengeState,
    /// Failure detail, empty unless the latest event carried one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Elapsed wall time in milliseconds, set on completion.
    #[serde(default)]
    pub duration_ms: u64,
}

/// Rollup counters across the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Distinct challenge ids seen, regardless of status.
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    /// `passed / (passed + failed) * 100`, or `0` when neither counter is set.
    pub pass_rate: f64,
}

impl DashboardSummary {
    fn recompute_pass_rate(&mut self) {
        let counted = self.passed + self.failed;
        self.pass_rate = if counted == 0 {
            0.0
        } else {
            f64::from(self.passed) / f64::from(counted) * 100.0
        };
    }
}

/// Derived per-run dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Opaque run label set at construction.
    pub run_id: String,
    /// Coarse run-level status ("running" until the owner changes it).
    /// Not derived from challenge states.
    pub status: String,
    /// Status record per challenge id.
    pub challenges: HashMap<String, ChallengeRecord>,
    /// Rollup counters.
    pub summary: DashboardSummary,
}

impl DashboardData {
    /// Create an empty aggregate for the given run.
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            status: "running".to_string(),
            challenges: HashMap::new(),
            summary: DashboardSummary::default(),
        }
    }

    /// Apply one event and recompute the affected counters in O(1).
    ///
    /// An id is counted toward `total` on its first event of any kind, so a
    /// challenge that only ever times out still counts. Duplicate terminal
    /// events for one id never double-count `total`, but each still
    /// increments its own category counter; the record always reflects the
    /// most recent event.
    pub fn update_from_event(&mut self, event: &ChallengeEvent) {
        if !self.challenges.contains_key(&event.challenge_id) {
            self.summary.total += 1;
        }

        let record = self
            .challenges
            .entry(event.challenge_id.clone())
            .or_insert_with(|| ChallengeRecord {
                name: event.name.clone(),
                status: ChallengeState::Running,
                message: String::new(),
                duration_ms: 0,
            });
        record.name = event.name.clone();

        match event.kind {
            EventKind::Started => {
                record.status = ChallengeState::Running;
                record.message.clear();
                record.duration_ms = 0;
            }
            EventKind::Completed => {
                record.status = ChallengeState::Passed;
                record.duration_ms = event.duration_ms;
                self.summary.passed += 1;
            }
            EventKind::Failed => {
                record.status = ChallengeState::Failed;
                record.message = event.message.clone();
                self.summary.failed += 1;
            }
            EventKind::Skipped => {
                record.status = ChallengeState::Skipped;
                self.summary.skipped += 1;
            }
            EventKind::TimedOut => {
                record.status = ChallengeState::TimedOut;
            }
        }

        self.summary.recompute_pass_rate();
    }
}

/// Rebuild an aggregate from the full event log, in arrival order.
///
/// The result is tagged with [`REPLAY_RUN_ID`] to mark it as a
/// reconstructed snapshot rather than a live run.
pub fn build_dashboard_data(log: &EventCollector) -> DashboardData {
    let mut data = DashboardData::new(REPLAY_RUN_ID);
    for event in log.snapshot() {
        data.update_from_event(&event);
    }
    data
}
