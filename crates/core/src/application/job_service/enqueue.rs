// Enqueue Use Case

use crate::application::registry::TaskRegistry;
use crate::domain::queue::validate_queue_name;
use crate::domain::{DomainError, Job, JobArguments, JobId, JobType};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, JobRepository, TaskDescriptor, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Longest accepted `delay_ms` (30 days)
pub const MAX_DELAY_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Enqueue request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub job_type: String,

    #[serde(default)]
    pub arguments: JobArguments,

    /// Overrides the task's declared queue
    #[serde(default)]
    pub queue: Option<String>,

    /// Hold the job back this long before it becomes ready
    #[serde(default)]
    pub delay_ms: Option<i64>,
}

impl EnqueueRequest {
    pub fn new(job_type: impl Into<String>, arguments: JobArguments) -> Self {
        Self {
            job_type: job_type.into(),
            arguments,
            queue: None,
            delay_ms: None,
        }
    }

    pub fn on_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

/// Check a request against the registry; returns the task's descriptor
pub fn validate_request(registry: &TaskRegistry, req: &EnqueueRequest) -> Result<TaskDescriptor> {
    let descriptor = registry
        .descriptor(&req.job_type)
        .ok_or_else(|| AppError::Validation(format!("unknown job type: {}", req.job_type)))?;

    if let Some(queue) = &req.queue {
        validate_queue_name(queue).map_err(|e| match e {
            DomainError::ValidationError(msg) => AppError::Validation(msg),
            other => AppError::Domain(other),
        })?;
    }

    if let Some(delay_ms) = req.delay_ms {
        if delay_ms < 0 {
            return Err(AppError::Validation(format!(
                "delay_ms must not be negative: {delay_ms}"
            )));
        }
        if delay_ms > MAX_DELAY_MS {
            return Err(AppError::Validation(format!(
                "delay_ms too large: {delay_ms} > {MAX_DELAY_MS}"
            )));
        }
    }

    Ok(descriptor)
}

/// Execute enqueue use case
///
/// # Arguments
///
/// * `job_repo` - Job repository
/// * `registry` - Registered task types
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `req` - Enqueue request
pub async fn execute(
    job_repo: &dyn JobRepository,
    registry: &TaskRegistry,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: EnqueueRequest,
) -> Result<JobId> {
    let descriptor = validate_request(registry, &req)?;

    let job_id = id_provider.generate_id();
    let created_at = time_provider.now_millis();
    let queue = req.queue.unwrap_or_else(|| descriptor.queue.to_string());

    let mut job = Job::new(
        job_id.clone(),
        created_at,
        queue,
        JobType::new(descriptor.name),
        req.arguments,
    );
    if let Some(delay_ms) = req.delay_ms {
        let scheduled_at = created_at.checked_add(delay_ms).ok_or_else(|| {
            AppError::Validation(format!("delay_ms overflows schedule time: {delay_ms}"))
        })?;
        job = job.schedule_at(scheduled_at);
    }

    job_repo.insert(&job).await?;

    info!(
        job_id = %job.id,
        job_type = %job.job_type.as_str(),
        queue = %job.queue,
        scheduled_at = ?job.scheduled_at,
        "Enqueued job"
    );

    Ok(job_id)
}
