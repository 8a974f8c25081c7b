//! Challenge execution.
//!
//! Runs each configured challenge as a child process and reports lifecycle
//! transitions through the progress sink. Execution is sequential; the
//! dashboard mirrors the batch order.

use std::process::Output;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

use gauntlet_core::ChallengeEvent;
use gauntlet_dashboard::ProgressSink;

use crate::config::ChallengeSpec;

/// Executes challenges and emits progress events.
pub struct ChallengeExecutor {
    sink: ProgressSink,
    default_timeout: Duration,
}

impl ChallengeExecutor {
    pub fn new(sink: ProgressSink, default_timeout: Duration) -> Self {
        Self {
            sink,
            default_timeout,
        }
    }

    /// Run every challenge in order.
    pub async fn run_all(&self, challenges: &[ChallengeSpec]) {
        for challenge in challenges {
            self.run_one(challenge).await;
        }
    }

    async fn run_one(&self, challenge: &ChallengeSpec) {
        if challenge.skip {
            info!(challenge = %challenge.id, "Challenge skipped");
            self.sink
                .emit(ChallengeEvent::skipped(&challenge.id, &challenge.name));
            return;
        }

        self.sink
            .emit(ChallengeEvent::started(&challenge.id, &challenge.name));

        let deadline = challenge
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);
        let started = Instant::now();

        match timeout(deadline, run_command(&challenge.command)).await {
            Err(_) => {
                warn!(
                    challenge = %challenge.id,
                    timeout_ms = deadline.as_millis() as u64,
                    "Challenge timed out"
                );
                self.sink
                    .emit(ChallengeEvent::timed_out(&challenge.id, &challenge.name));
            }
            Ok(Ok(output)) if output.status.success() => {
                let elapsed = started.elapsed();
                info!(
                    challenge = %challenge.id,
                    duration_ms = elapsed.as_millis() as u64,
                    "Challenge passed"
                );
                self.sink.emit(ChallengeEvent::completed(
                    &challenge.id,
                    &challenge.name,
                    elapsed,
                ));
            }
            Ok(Ok(output)) => {
                let message = failure_message(&output);
                warn!(challenge = %challenge.id, %message, "Challenge failed");
                self.sink.emit(ChallengeEvent::failed(
                    &challenge.id,
                    &challenge.name,
                    message,
                ));
            }
            Ok(Err(error)) => {
                warn!(challenge = %challenge.id, %error, "Failed to launch challenge");
                self.sink.emit(ChallengeEvent::failed(
                    &challenge.id,
                    &challenge.name,
                    format!("failed to launch: {error}"),
                ));
            }
        }
    }
}

/// Run a challenge command through the shell, capturing its output.
///
/// The child is killed if the future is dropped, which is how a timed-out
/// challenge is reaped.
async fn run_command(command: &str) -> std::io::Result<Output> {
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .kill_on_drop(true)
        .output()
        .await
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr.trim();
    match output.status.code() {
        Some(code) if detail.is_empty() => format!("exit status {code}"),
        Some(code) => format!("exit status {code}: {detail}"),
        None => "terminated by signal".to_string(),
    }
}
