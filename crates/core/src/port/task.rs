// Task Port
// A task type is registered once; every dequeued job becomes one `perform` call.

use crate::domain::JobArguments;
use async_trait::async_trait;
use thiserror::Error;

/// Static identity of a task type
///
/// Declared as a `const` on the implementing type so the queue label is
/// fixed per task type and never chosen per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDescriptor {
    /// Name jobs refer to this task by
    pub name: &'static str,
    /// Queue the runner routes this task's jobs to
    pub queue: &'static str,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

/// A unit of deferred work
#[async_trait]
pub trait Task: Send + Sync {
    /// Name and queue of this task type
    fn descriptor(&self) -> TaskDescriptor;

    /// Execute the task body once with the job's stored arguments
    ///
    /// # Errors
    /// Whatever the task reports; the runner decides what a failure means.
    async fn perform(&self, arguments: &JobArguments) -> Result<(), ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock task behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock Task recording every call's arguments
    pub struct MockTask {
        descriptor: TaskDescriptor,
        behavior: MockBehavior,
        calls: Arc<Mutex<Vec<JobArguments>>>,
    }

    impl MockTask {
        pub fn new(name: &'static str, queue: &'static str, behavior: MockBehavior) -> Self {
            Self {
                descriptor: TaskDescriptor { name, queue },
                behavior,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success(name: &'static str, queue: &'static str) -> Self {
            Self::new(name, queue, MockBehavior::Success)
        }

        pub fn new_fail(name: &'static str, queue: &'static str, message: impl Into<String>) -> Self {
            Self::new(name, queue, MockBehavior::Fail(message.into()))
        }

        pub fn new_panic_inducing(
            name: &'static str,
            queue: &'static str,
            message: impl Into<String>,
        ) -> Self {
            Self::new(name, queue, MockBehavior::Panic(message.into()))
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<JobArguments> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Task for MockTask {
        fn descriptor(&self) -> TaskDescriptor {
            self.descriptor
        }

        async fn perform(&self, arguments: &JobArguments) -> Result<(), ExecutionError> {
            self.calls.lock().unwrap().push(arguments.clone());

            match &self.behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::Fail(msg) => Err(ExecutionError::TaskFailed(msg.clone())),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
