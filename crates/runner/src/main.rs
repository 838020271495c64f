//! Delayed Jobs Runner - Main Entry Point
//! In-process worker over an in-memory queue

mod config;
mod drain;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use config::RunnerConfig;
use delayed_core::application::{
    shutdown_channel, DelayedTask, EnqueueRequest, JobService, TaskRegistry, Worker,
};
use delayed_core::domain::JobState;
use delayed_core::port::id_provider::UuidProvider;
use delayed_core::port::time_provider::SystemTimeProvider;
use delayed_core::port::{JobRepository, TimeProvider};
use delayed_infra_memory::InMemoryJobRepository;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let config = RunnerConfig::parse();
    logging::init(config.log_format)?;

    info!("Delayed Jobs runner v{} starting...", VERSION);

    let startup_jobs = config.startup_arguments()?;

    // 2. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let registry = Arc::new(TaskRegistry::with_builtin_tasks()?);
    let job_repo = Arc::new(InMemoryJobRepository::new());

    info!(tasks = ?registry.names(), "Registered tasks");

    let service = JobService::new(
        job_repo.clone(),
        registry.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
    );

    // 3. Submit start-up jobs
    let declared_queue = DelayedTask::DESCRIPTOR.queue;
    if !startup_jobs.is_empty() && config.queue != declared_queue {
        warn!(
            declared = declared_queue,
            serving = %config.queue,
            "Routing start-up jobs to the served queue instead of the declared one"
        );
    }
    for arguments in startup_jobs {
        let mut req = EnqueueRequest::new(DelayedTask::DESCRIPTOR.name, arguments);
        if config.queue != declared_queue {
            req = req.on_queue(config.queue.clone());
        }
        if let Some(delay_ms) = config.delay_ms {
            req = req.with_delay_ms(delay_ms);
        }
        service
            .enqueue(req)
            .await
            .context("Failed to submit start-up job")?;
    }

    // 4. Start Worker (job processing loop)
    info!(queue = %config.queue, "Starting worker...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let worker = Worker::new(
        config.queue.clone(),
        job_repo.clone(),
        registry,
        time_provider,
    );

    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker.run(shutdown_rx).await {
            error!(error = ?e, "Worker failed");
        }
    });

    // 5. Wait for the queue to drain or for Ctrl+C
    if config.drain {
        tokio::select! {
            res = drain::wait_until_drained(job_repo.as_ref(), &config.queue) => res?,
            res = tokio::signal::ctrl_c() => res?,
        }
    } else {
        info!("System ready. Press Ctrl+C to shutdown");
        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received. Exiting gracefully...");
    }

    // 6. Graceful shutdown: the in-flight job gets the grace period
    shutdown_tx.shutdown();
    let grace = Duration::from_secs(config.shutdown_grace_secs);
    if tokio::time::timeout(grace, worker_handle).await.is_err() {
        warn!(grace_secs = config.shutdown_grace_secs, "Worker did not stop within grace period");
    }

    let done = job_repo.find_by_state(JobState::Done).await?.len();
    let failed = job_repo.find_by_state(JobState::Failed).await?.len();
    info!(done, failed, "Shutdown complete.");

    Ok(())
}
