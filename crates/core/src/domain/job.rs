// Job Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::queue::QueueId;

/// Job ID (UUID v4)
pub type JobId = String;

/// Job State
///
/// `Queued -> Running -> Done` is the only path a task drives; `Failed` is
/// recorded by the runner when execution errors, panics or cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Queued,
    Running,
    Done,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Queued => write!(f, "QUEUED"),
            JobState::Running => write!(f, "RUNNING"),
            JobState::Done => write!(f, "DONE"),
            JobState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Job Type (name of the registered task that runs this job)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobType(String);

impl JobType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordered, untyped arguments captured at enqueue time
///
/// Serializes as a plain JSON array. Arity and element types are never
/// checked here; that is between the submitter and the task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobArguments(Vec<serde_json::Value>);

impl JobArguments {
    pub fn new(values: Vec<serde_json::Value>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[serde_json::Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<serde_json::Value>> for JobArguments {
    fn from(values: Vec<serde_json::Value>) -> Self {
        Self(values)
    }
}

/// Job Entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub queue: QueueId,
    pub job_type: JobType,
    pub arguments: JobArguments,
    pub state: JobState,

    pub created_at: i64, // epoch ms
    pub scheduled_at: Option<i64>,
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,

    /// Failure message recorded by the runner
    pub error: Option<String>,
}

impl Job {
    /// Create a new Job in `Queued` state
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `queue` - Queue name
    /// * `job_type` - Registered task name
    /// * `arguments` - Arguments handed to the task when it runs
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        queue: impl Into<String>,
        job_type: JobType,
        arguments: JobArguments,
    ) -> Self {
        Self {
            id: id.into(),
            queue: queue.into(),
            job_type,
            arguments,
            state: JobState::Queued,
            created_at,
            scheduled_at: None,
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    /// Delay execution until `at_millis` (epoch ms)
    pub fn schedule_at(mut self, at_millis: i64) -> Self {
        self.scheduled_at = Some(at_millis);
        self
    }

    /// True when the job is queued and its schedule (if any) has passed
    pub fn is_ready(&self, now_millis: i64) -> bool {
        self.state == JobState::Queued && self.scheduled_at.map_or(true, |at| at <= now_millis)
    }

    /// Transition to Running state with explicit timestamp
    pub fn start(&mut self, now_millis: i64) -> Result<()> {
        if self.state != JobState::Queued {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: JobState::Running.to_string(),
            });
        }
        self.state = JobState::Running;
        self.started_at = Some(now_millis);
        Ok(())
    }

    /// Transition to Done state with explicit timestamp
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        if self.state != JobState::Running {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: JobState::Done.to_string(),
            });
        }
        self.state = JobState::Done;
        self.finished_at = Some(now_millis);
        Ok(())
    }

    /// Mark as Failed with explicit timestamp
    pub fn fail(&mut self, now_millis: i64, reason: impl Into<String>) {
        self.state = JobState::Failed;
        self.finished_at = Some(now_millis);
        self.error = Some(reason.into());
    }

    /// Wall-clock run time, once both ends are known
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job() -> Job {
        Job::new(
            "job-1",
            1000,
            "default",
            JobType::new("clever_utility"),
            JobArguments::new(vec![json!(42), json!("x")]),
        )
    }

    #[test]
    fn test_lifecycle_queued_running_done() {
        let mut job = job();
        assert_eq!(job.state, JobState::Queued);

        job.start(2000).unwrap();
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.started_at, Some(2000));

        job.complete(17_000).unwrap();
        assert_eq!(job.state, JobState::Done);
        assert_eq!(job.duration_ms(), Some(15_000));
        assert!(job.error.is_none());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut job = job();
        assert!(job.complete(2000).is_err());

        job.start(2000).unwrap();
        let err = job.start(3000).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid job state transition: RUNNING -> RUNNING"
        );
    }

    #[test]
    fn test_fail_records_reason() {
        let mut job = job();
        job.start(2000).unwrap();
        job.fail(2500, "boom");
        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.error.as_deref(), Some("boom"));
        assert_eq!(job.finished_at, Some(2500));
    }

    #[test]
    fn test_scheduled_job_not_ready_until_due() {
        let job = job().schedule_at(5000);
        assert!(!job.is_ready(4999));
        assert!(job.is_ready(5000));
    }

    #[test]
    fn test_arguments_serialize_as_array() {
        let job = job();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["arguments"], json!([42, "x"]));
        assert_eq!(value["state"], json!("QUEUED"));

        let empty = JobArguments::empty();
        assert_eq!(serde_json::to_string(&empty).unwrap(), "[]");
        assert!(empty.is_empty());
    }
}
