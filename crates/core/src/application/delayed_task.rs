// Delayed Task - waits a fixed time, then logs completion

use crate::domain::{JobArguments, DEFAULT_QUEUE};
use crate::port::{ExecutionError, Task, TaskDescriptor};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// How long one run keeps its worker occupied
pub const DELAYED_TASK_DURATION: Duration = Duration::from_secs(15);

/// The completion record, emitted verbatim once per run
pub const DELAYED_TASK_MESSAGE: &str = "Logging this message after a delay of 15 seconds.";

/// Simulates a slow unit of work.
///
/// Arguments are accepted in any shape and ignored; they never reach the
/// log record. The worker awaits the whole run, so it takes no other job
/// during the wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelayedTask;

impl DelayedTask {
    pub const DESCRIPTOR: TaskDescriptor = TaskDescriptor {
        name: "clever_utility",
        queue: DEFAULT_QUEUE,
    };
}

#[async_trait]
impl Task for DelayedTask {
    fn descriptor(&self) -> TaskDescriptor {
        Self::DESCRIPTOR
    }

    async fn perform(&self, _arguments: &JobArguments) -> Result<(), ExecutionError> {
        tokio::time::sleep(DELAYED_TASK_DURATION).await;
        info!("{}", DELAYED_TASK_MESSAGE);
        Ok(())
    }
}
