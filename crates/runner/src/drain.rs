//! `--drain`: wait until the served queue has no work left

use anyhow::Result;
use delayed_core::domain::JobState;
use delayed_core::port::JobRepository;
use std::time::Duration;
use tracing::info;

/// How often `--drain` checks for remaining work
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Resolve once `queue` has no QUEUED and no RUNNING jobs
///
/// Scheduled jobs stay QUEUED until they run, so they hold the drain open.
pub async fn wait_until_drained(job_repo: &dyn JobRepository, queue: &str) -> Result<()> {
    loop {
        let queued = job_repo.count_by_state(queue, JobState::Queued).await?;
        let running = job_repo.count_by_state(queue, JobState::Running).await?;
        if queued == 0 && running == 0 {
            info!(queue = %queue, "Queue drained");
            return Ok(());
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
