//! Challenge lifecycle events.
//!
//! Events are immutable facts produced once and never modified. The same
//! serialized form is appended to the log, folded into the dashboard
//! aggregate, and pushed to connected observers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle transition a challenge event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Challenge execution began.
    Started,
    /// Challenge finished successfully.
    Completed,
    /// Challenge finished with an error.
    Failed,
    /// Challenge was skipped without executing.
    Skipped,
    /// Challenge exceeded its deadline.
    TimedOut,
}

/// An immutable fact about one challenge at one moment.
///
/// Events for a given `challenge_id` normally arrive Started → terminal,
/// but consumers must tolerate any order, including a terminal event with
/// no preceding Started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeEvent {
    /// Transition kind.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Stable identifier, unique per challenge across its lifetime.
    pub challenge_id: String,
    /// Human-readable label. Not unique; repeats across events for one id.
    pub name: String,
    /// Free-form detail, populated for failures.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Elapsed wall time in milliseconds, meaningful for completions.
    #[serde(default)]
    pub duration_ms: u64,
    /// Unix milliseconds when the event was produced.
    pub timestamp_ms: i64,
}

impl ChallengeEvent {
    fn new(kind: EventKind, challenge_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            challenge_id: challenge_id.into(),
            name: name.into(),
            message: String::new(),
            duration_ms: 0,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Event for a challenge that began executing.
    pub fn started(challenge_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(EventKind::Started, challenge_id, name)
    }

    /// Event for a challenge that finished successfully.
    pub fn completed(
        challenge_id: impl Into<String>,
        name: impl Into<String>,
        duration: Duration,
    ) -> Self {
        let mut event = Self::new(EventKind::Completed, challenge_id, name);
        event.duration_ms = duration.as_millis() as u64;
        event
    }

    /// Event for a challenge that finished with an error.
    pub fn failed(
        challenge_id: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut event = Self::new(EventKind::Failed, challenge_id, name);
        event.message = message.into();
        event
    }

    /// Event for a challenge that was skipped without executing.
    pub fn skipped(challenge_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(EventKind::Skipped, challenge_id, name)
    }

    /// Event for a challenge that exceeded its deadline.
    pub fn timed_out(challenge_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(EventKind::TimedOut, challenge_id, name)
    }
}
