//! Request bodies for the platform API.

use std::collections::HashMap;

use serde::Serialize;

use gauntlet_core::{ChallengeRecord, DashboardData, DashboardSummary};

/// Final report for one run, posted when the batch finishes.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: String,
    /// Run-level status at submission time.
    pub status: String,
    /// Rollup counters.
    pub summary: DashboardSummary,
    /// Final status record per challenge id.
    pub challenges: HashMap<String, ChallengeRecord>,
}

impl From<&DashboardData> for RunReport {
    fn from(data: &DashboardData) -> Self {
        Self {
            run_id: data.run_id.clone(),
            status: data.status.clone(),
            summary: data.summary.clone(),
            challenges: data.challenges.clone(),
        }
    }
}
