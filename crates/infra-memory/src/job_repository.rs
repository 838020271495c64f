// In-Memory JobRepository Implementation

use async_trait::async_trait;
use delayed_core::domain::{DomainError, Job, JobId, JobState};
use delayed_core::error::{AppError, Result};
use delayed_core::port::JobRepository;
use tokio::sync::Mutex;
use tracing::debug;

/// Jobs kept in submission order behind one async mutex
///
/// Everything is lost when the process exits.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs, any state
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        if jobs.iter().any(|j| j.id == job.id) {
            return Err(AppError::Conflict(format!("job already exists: {}", job.id)));
        }
        jobs.push(job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>> {
        let jobs = self.jobs.lock().await;
        Ok(jobs.iter().find(|j| &j.id == id).cloned())
    }

    async fn update(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        let slot = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| DomainError::JobNotFound(job.id.clone()))?;
        *slot = job.clone();
        Ok(())
    }

    async fn pop_next(&self, queue: &str, now_millis: i64) -> Result<Option<Job>> {
        let mut jobs = self.jobs.lock().await;

        // Oldest first; submission order breaks created_at ties
        let next = jobs
            .iter_mut()
            .filter(|j| j.queue == queue && j.is_ready(now_millis))
            .min_by_key(|j| j.created_at);

        match next {
            Some(job) => {
                job.start(now_millis)?;
                debug!(job_id = %job.id, queue = %queue, "Popped job");
                Ok(Some(job.clone()))
            }
            None => Ok(None),
        }
    }

    async fn count_by_state(&self, queue: &str, state: JobState) -> Result<i64> {
        let jobs = self.jobs.lock().await;
        Ok(jobs
            .iter()
            .filter(|j| j.queue == queue && j.state == state)
            .count() as i64)
    }

    async fn find_by_state(&self, state: JobState) -> Result<Vec<Job>> {
        let jobs = self.jobs.lock().await;
        Ok(jobs.iter().filter(|j| j.state == state).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delayed_core::domain::{JobArguments, JobType};
    use serde_json::json;

    fn job(id: &str, created_at: i64, queue: &str) -> Job {
        Job::new(
            id,
            created_at,
            queue,
            JobType::new("clever_utility"),
            JobArguments::new(vec![json!(id)]),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryJobRepository::new();
        repo.insert(&job("a", 1000, "default")).await.unwrap();

        let found = repo.find_by_id(&"a".to_string()).await.unwrap();
        assert_eq!(found.unwrap().arguments.as_slice(), &[json!("a")]);
        assert!(repo.find_by_id(&"b".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let repo = InMemoryJobRepository::new();
        repo.insert(&job("a", 1000, "default")).await.unwrap();
        let err = repo.insert(&job("a", 2000, "default")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_pop_next_fifo_per_queue() {
        let repo = InMemoryJobRepository::new();
        repo.insert(&job("late", 3000, "default")).await.unwrap();
        repo.insert(&job("early", 1000, "default")).await.unwrap();
        repo.insert(&job("other", 500, "mailers")).await.unwrap();

        let first = repo.pop_next("default", 5000).await.unwrap().unwrap();
        assert_eq!(first.id, "early");
        assert_eq!(first.state, JobState::Running);
        assert_eq!(first.started_at, Some(5000));

        let second = repo.pop_next("default", 5000).await.unwrap().unwrap();
        assert_eq!(second.id, "late");

        assert!(repo.pop_next("default", 5000).await.unwrap().is_none());
        assert_eq!(repo.count_by_state("default", JobState::Running).await.unwrap(), 2);
        assert_eq!(repo.count_by_state("mailers", JobState::Queued).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pop_next_skips_scheduled_jobs_until_due() {
        let repo = InMemoryJobRepository::new();
        repo.insert(&job("later", 1000, "default").schedule_at(10_000))
            .await
            .unwrap();

        assert!(repo.pop_next("default", 9_999).await.unwrap().is_none());
        let popped = repo.pop_next("default", 10_000).await.unwrap().unwrap();
        assert_eq!(popped.id, "later");
    }

    #[tokio::test]
    async fn test_update_missing_job() {
        let repo = InMemoryJobRepository::new();
        let err = repo.update(&job("ghost", 1000, "default")).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::JobNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_persists_state() {
        let repo = InMemoryJobRepository::new();
        repo.insert(&job("a", 1000, "default")).await.unwrap();

        let mut running = repo.pop_next("default", 2000).await.unwrap().unwrap();
        running.complete(17_000).unwrap();
        repo.update(&running).await.unwrap();

        let done = repo.find_by_state(JobState::Done).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].duration_ms(), Some(15_000));
    }
}
