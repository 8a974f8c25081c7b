//! gauntlet-dashboard - Live progress dashboard server.
//!
//! Serves the state of a running challenge batch to any number of passive
//! observers:
//!
//! - `GET /health` - liveness probe
//! - `GET /dashboard` - JSON snapshot of the current aggregate
//! - `GET /events` - Server-Sent Events push feed (initial snapshot, then
//!   one message per subsequent challenge event)
//!
//! # Architecture
//!
//! ```text
//! producer ──emit──▶ ProgressSink
//!                      │  append      EventCollector
//!                      │  fold        DashboardData (RwLock)
//!                      └─ broadcast ─▶ ObserverRegistry
//!                                       │ try_send per observer queue
//!                                       ▼
//!                                  /events streams (one task each)
//! ```
//!
//! The registry fan-out is best-effort: a slow observer's full queue drops
//! that payload for that observer only, and never blocks the producer.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use gauntlet_core::{DashboardData, EventCollector};
//! use gauntlet_dashboard::{DashboardConfig, DashboardServer};
//!
//! let collector = Arc::new(EventCollector::new());
//! let dashboard = Arc::new(RwLock::new(DashboardData::new("run-1")));
//! let server = Arc::new(DashboardServer::new(
//!     DashboardConfig::default(),
//!     collector,
//!     dashboard,
//! ));
//!
//! let sink = server.sink();
//! tokio::spawn({
//!     let server = server.clone();
//!     async move {
//!         if let Err(e) = server.serve().await {
//!             tracing::error!(error = %e, "Dashboard server failed");
//!         }
//!     }
//! });
//! ```

mod config;
mod error;
mod registry;
mod server;
mod sink;

pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
pub use registry::{ObserverId, ObserverRegistry};
pub use server::{DashboardServer, LifecycleState};
pub use sink::ProgressSink;
