// Worker - Job execution loop

pub mod constants;
mod panic_message;
mod shutdown;

use constants::*;
pub use panic_message::panic_message;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::registry::TaskRegistry;
use crate::domain::Job;
use crate::error::Result;
use crate::port::{ExecutionError, JobRepository, TimeProvider};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info};

/// Worker processes jobs from one queue, one job at a time
pub struct Worker {
    queue: String,
    job_repo: Arc<dyn JobRepository>,
    registry: Arc<TaskRegistry>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Worker {
    pub fn new(
        queue: impl Into<String>,
        job_repo: Arc<dyn JobRepository>,
        registry: Arc<TaskRegistry>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            queue: queue.into(),
            job_repo,
            registry,
            time_provider,
        }
    }

    /// Run worker loop with graceful shutdown support
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Worker started for queue: {}", self.queue);
        loop {
            if shutdown.is_shutdown() {
                info!("Worker shutting down for queue: {}", self.queue);
                break;
            }
            match self.process_next_job().await {
                Ok(true) => {}
                Ok(false) => {
                    // No job available, sleep briefly (or wait for shutdown)
                    tokio::select! {
                        _ = sleep(IDLE_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Worker interrupted during idle");
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("Worker error: {}", e);
                    tokio::select! {
                        _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Worker interrupted during error recovery");
                            break;
                        }
                    }
                }
            }
        }
        info!("Worker stopped for queue: {}", self.queue);
        Ok(())
    }

    /// Process next job from queue (returns true if job was processed)
    ///
    /// Task failures never surface here: they are recorded on the job as
    /// FAILED. Only repository and state-transition errors are returned.
    pub async fn process_next_job(&self) -> Result<bool> {
        let now = self.time_provider.now_millis();

        // Pop next job (already atomically set to RUNNING by the repository)
        let mut job = match self.job_repo.pop_next(&self.queue, now).await? {
            Some(j) => j,
            None => return Ok(false),
        };

        info!(
            job_id = %job.id,
            job_type = %job.job_type.as_str(),
            queue = %job.queue,
            arguments = job.arguments.len(),
            "Performing job"
        );

        match self.execute_job(&job).await {
            Ok(()) => {
                job.complete(self.time_provider.now_millis())?;
                info!(
                    job_id = %job.id,
                    job_type = %job.job_type.as_str(),
                    duration_ms = job.duration_ms().unwrap_or_default(),
                    "Performed job"
                );
            }
            Err(e) => {
                job.fail(self.time_provider.now_millis(), e.to_string());
                error!(
                    job_id = %job.id,
                    job_type = %job.job_type.as_str(),
                    error = %e,
                    "Job failed"
                );
            }
        }

        self.job_repo.update(&job).await?;
        Ok(true)
    }

    /// Resolve the job's task and run it on a spawned tokio task
    ///
    /// Spawning isolates panics: a panicking task fails its job instead of
    /// taking the worker down.
    async fn execute_job(&self, job: &Job) -> std::result::Result<(), ExecutionError> {
        let task = self
            .registry
            .get(job.job_type.as_str())
            .ok_or_else(|| ExecutionError::UnknownTask(job.job_type.as_str().to_string()))?;

        let arguments = job.arguments.clone();
        let handle = tokio::task::spawn(async move { task.perform(&arguments).await });

        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                Err(ExecutionError::Panicked(panic_message(join_err.into_panic())))
            }
            Err(join_err) => Err(ExecutionError::TaskFailed(format!(
                "task cancelled: {join_err}"
            ))),
        }
    }
}
