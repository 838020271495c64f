// Job Repository Port (Interface)

use crate::domain::{Job, JobId, JobState};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for queued jobs
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job
    async fn insert(&self, job: &Job) -> Result<()>;

    /// Find job by ID
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>>;

    /// Replace a stored job
    async fn update(&self, job: &Job) -> Result<()>;

    /// Pop the oldest ready job from a queue and mark it RUNNING
    ///
    /// A job is ready when it is QUEUED and its `scheduled_at` is absent or
    /// not after `now_millis`. Selection and the state change happen
    /// atomically, so one job is never handed out twice.
    async fn pop_next(&self, queue: &str, now_millis: i64) -> Result<Option<Job>>;

    /// Count jobs of a queue by state
    async fn count_by_state(&self, queue: &str, state: JobState) -> Result<i64>;

    /// Find all jobs by state
    async fn find_by_state(&self, state: JobState) -> Result<Vec<Job>>;
}
