//! Core domain types for the gauntlet challenge runner.
//!
//! This crate provides the event model and the in-memory state shared by
//! the runner and the dashboard server:
//! - `ChallengeEvent`: an immutable fact about one challenge lifecycle transition
//! - `EventCollector`: append-only, thread-safe log of every event in a run
//! - `DashboardData`: the per-run aggregate derived from the event stream

pub mod collector;
pub mod dashboard;
pub mod event;

pub use collector::EventCollector;
pub use dashboard::{
    build_dashboard_data, ChallengeRecord, ChallengeState, DashboardData, DashboardSummary,
    REPLAY_RUN_ID,
};
pub use event::{ChallengeEvent, EventKind};
