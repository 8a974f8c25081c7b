//! HTTP server implementation using axum.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use futures_util::stream;
use futures_util::StreamExt;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use gauntlet_core::{DashboardData, EventCollector};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::registry::{ObserverId, ObserverRegistry};
use crate::sink::ProgressSink;

/// Server lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Starting,
    Serving,
    Stopping,
    Stopped,
}

/// Shared state handed to request handlers.
///
/// An explicit struct rather than process-level state, so independent
/// server instances can coexist (one per test, for example).
#[derive(Clone)]
struct AppState {
    collector: Arc<EventCollector>,
    dashboard: Arc<RwLock<DashboardData>>,
    registry: Arc<ObserverRegistry>,
    shutdown: CancellationToken,
}

/// Dashboard HTTP server.
///
/// Owns the observer registry and the lifecycle state machine:
/// `Created → Starting → Serving → Stopping → Stopped`.
pub struct DashboardServer {
    config: DashboardConfig,
    state: AppState,
    lifecycle: watch::Sender<LifecycleState>,
    local_addr: RwLock<Option<SocketAddr>>,
}

impl DashboardServer {
    /// Create a server over the given log and aggregate. Nothing is bound
    /// until [`DashboardServer::serve`] runs.
    pub fn new(
        config: DashboardConfig,
        collector: Arc<EventCollector>,
        dashboard: Arc<RwLock<DashboardData>>,
    ) -> Self {
        let registry = Arc::new(ObserverRegistry::new(config.queue_capacity));
        let (lifecycle, _) = watch::channel(LifecycleState::Created);
        Self {
            config,
            state: AppState {
                collector,
                dashboard,
                registry,
                shutdown: CancellationToken::new(),
            },
            lifecycle,
            local_addr: RwLock::new(None),
        }
    }

    /// Producer-facing handle that feeds this server's observers.
    ///
    /// The sink can be cloned and used from any task; it works whether or
    /// not the server is currently serving.
    pub fn sink(&self) -> ProgressSink {
        ProgressSink::new(
            self.state.collector.clone(),
            self.state.dashboard.clone(),
            self.state.registry.clone(),
        )
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> LifecycleState {
        *self.lifecycle.borrow()
    }

    /// Address actually bound, available once the server reaches `Serving`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.read()
    }

    /// Number of currently connected push-feed observers.
    pub fn observer_count(&self) -> usize {
        self.state.registry.observer_count()
    }

    /// Bind the configured address and serve until [`DashboardServer::stop`].
    ///
    /// Runs the accept loop to completion; spawn it on its own task. A bind
    /// failure moves the server straight to `Stopped` and is returned to
    /// the caller.
    pub async fn serve(&self) -> DashboardResult<()> {
        let mut started = false;
        self.lifecycle.send_modify(|state| {
            if *state == LifecycleState::Created {
                *state = LifecycleState::Starting;
                started = true;
            }
        });
        if !started {
            return Err(DashboardError::AlreadyStarted);
        }

        let addr = self.config.bind_addr();
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => {
                self.lifecycle.send_replace(LifecycleState::Stopped);
                return Err(DashboardError::Bind { addr, source });
            }
        };
        if let Ok(local) = listener.local_addr() {
            *self.local_addr.write() = Some(local);
        }
        info!(addr = %addr, "Dashboard server listening");

        self.lifecycle.send_replace(LifecycleState::Serving);

        let app = router(self.state.clone());
        let shutdown = self.state.shutdown.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;

        self.lifecycle.send_replace(LifecycleState::Stopped);
        info!("Dashboard server stopped");
        result.map_err(DashboardError::Serve)
    }

    /// Request shutdown and wait for the drain to finish.
    ///
    /// New connections are refused and in-flight requests are allowed to
    /// finish, bounded by the configured drain deadline. Stopping a server
    /// that was never started is a no-op success.
    pub async fn stop(&self) -> DashboardResult<()> {
        let mut stopping = false;
        self.lifecycle.send_modify(|state| {
            if matches!(*state, LifecycleState::Starting | LifecycleState::Serving) {
                *state = LifecycleState::Stopping;
                stopping = true;
            }
        });
        if !stopping {
            debug!(state = ?self.lifecycle(), "Stop requested with nothing to drain");
            return Ok(());
        }

        info!("Dashboard server shutdown requested");
        self.state.shutdown.cancel();
        self.state.registry.close_all();

        let drain = Duration::from_millis(self.config.shutdown_timeout_ms);
        let mut lifecycle_rx = self.lifecycle.subscribe();
        let drained = timeout(
            drain,
            lifecycle_rx.wait_for(|state| *state == LifecycleState::Stopped),
        )
        .await;
        match drained {
            Ok(_) => Ok(()),
            Err(_) => Err(DashboardError::DrainTimeout(drain)),
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(get_dashboard))
        .route("/events", get(events))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Full dashboard aggregate as JSON.
async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardData> {
    Json(state.dashboard.read().clone())
}

/// Deregisters an observer when its stream is dropped, whichever of client
/// disconnect, queue closure, or server shutdown happens first.
struct ObserverGuard {
    registry: Arc<ObserverRegistry>,
    id: ObserverId,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}

/// Long-lived push feed.
///
/// Sends one `dashboard` message carrying the current aggregate, then a
/// `challenge` message for every event broadcast while the observer stays
/// connected. The stream ends on client disconnect, server shutdown, or
/// queue closure.
async fn events(State(state): State<AppState>) -> impl IntoResponse {
    let (id, rx) = state.registry.register();
    let guard = ObserverGuard {
        registry: state.registry.clone(),
        id,
    };

    let snapshot = state.dashboard.read().clone();
    let initial = match serde_json::to_string(&snapshot) {
        Ok(json) => Some(Ok::<_, Infallible>(
            Event::default().event("dashboard").data(json),
        )),
        Err(error) => {
            warn!(%error, "Failed to serialize dashboard snapshot, skipping initial message");
            None
        }
    };

    let shutdown = state.shutdown.clone();
    let feed = stream::unfold((rx, shutdown, guard), |(mut rx, shutdown, guard)| async move {
        let payload = tokio::select! {
            _ = shutdown.cancelled() => None,
            payload = rx.recv() => payload,
        }?;
        let event = Event::default().event("challenge").data(payload);
        Some((Ok(event), (rx, shutdown, guard)))
    });

    let stream = stream::iter(initial).chain(feed);

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}
