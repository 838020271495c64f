// Job Service - submission and inline execution of registered tasks

pub mod enqueue;

pub use enqueue::EnqueueRequest;

use crate::application::registry::TaskRegistry;
use crate::domain::{Job, JobArguments, JobId};
use crate::error::Result;
use crate::port::{IdProvider, JobRepository, TimeProvider};
use std::sync::Arc;

/// Job Service
pub struct JobService {
    job_repo: Arc<dyn JobRepository>,
    registry: Arc<TaskRegistry>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobService {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        registry: Arc<TaskRegistry>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_repo,
            registry,
            id_provider,
            time_provider,
        }
    }

    /// Enqueue a new job
    pub async fn enqueue(&self, req: EnqueueRequest) -> Result<JobId> {
        enqueue::execute(
            self.job_repo.as_ref(),
            self.registry.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Run a registered task right now on the caller
    pub async fn perform_now(&self, job_type: &str, arguments: &JobArguments) -> Result<()> {
        self.registry.perform_now(job_type, arguments).await
    }

    pub async fn find(&self, id: &JobId) -> Result<Option<Job>> {
        self.job_repo.find_by_id(id).await
    }
}
