//! Run orchestration.
//!
//! Wires the components together: event log, dashboard aggregate,
//! broadcast server, challenge executor, and the optional run report.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use gauntlet_api::{ApiClient, RunReport};
use gauntlet_core::{DashboardData, EventCollector};
use gauntlet_dashboard::{DashboardServer, ProgressSink};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::executor::ChallengeExecutor;

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Execute the batch and serve the dashboard until interrupted.
    pub async fn run(&self) -> AppResult<()> {
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            challenges = self.config.challenges.len(),
            "Starting run"
        );

        let collector = Arc::new(EventCollector::new());
        let dashboard = Arc::new(RwLock::new(DashboardData::new(&run_id)));
        let server = Arc::new(DashboardServer::new(
            self.config.dashboard.clone(),
            collector,
            dashboard,
        ));
        let sink = server.sink();

        let serving = self.config.dashboard.enabled;
        if serving {
            let server = server.clone();
            tokio::spawn(async move {
                if let Err(e) = server.serve().await {
                    error!(error = %e, "Dashboard server failed");
                }
            });
        }

        let executor = ChallengeExecutor::new(
            sink.clone(),
            Duration::from_millis(self.config.challenge_timeout_ms),
        );
        executor.run_all(&self.config.challenges).await;

        sink.set_run_status("completed");
        let data = sink.dashboard();
        info!(
            total = data.summary.total,
            passed = data.summary.passed,
            failed = data.summary.failed,
            skipped = data.summary.skipped,
            pass_rate = data.summary.pass_rate,
            "Run finished"
        );

        self.submit_report(&sink).await;

        if serving {
            info!("Dashboard still serving; press Ctrl-C to exit");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received");
            server.stop().await?;
        }

        Ok(())
    }

    /// Best-effort report submission; failures are logged, never fatal.
    async fn submit_report(&self, sink: &ProgressSink) {
        if !self.config.report.enabled {
            return;
        }
        let Some(api_key) = self.config.report.resolve_api_key() else {
            warn!("Run report enabled but no API key configured, skipping");
            return;
        };

        match ApiClient::new(&self.config.report.base_url, api_key) {
            Ok(client) => {
                let report = RunReport::from(&sink.dashboard());
                if let Err(error) = client.submit_report(&report).await {
                    warn!(%error, "Failed to submit run report");
                }
            }
            Err(error) => {
                warn!(%error, "Failed to create API client, skipping report");
            }
        }
    }
}
