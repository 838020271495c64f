// Task Registry - task types known to this process

use crate::application::delayed_task::DelayedTask;
use crate::domain::JobArguments;
use crate::error::{AppError, Result};
use crate::port::{Task, TaskDescriptor};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Maps task names to their implementation.
///
/// Filled once at start-up and shared read-only afterwards.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<&'static str, Arc<dyn Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every task this crate ships
    pub fn with_builtin_tasks() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(DelayedTask))?;
        Ok(registry)
    }

    /// Register a task type under its descriptor name
    ///
    /// # Errors
    /// `AppError::Conflict` if the name is already taken
    pub fn register(&mut self, task: Arc<dyn Task>) -> Result<()> {
        let descriptor = task.descriptor();
        if self.tasks.contains_key(descriptor.name) {
            return Err(AppError::Conflict(format!(
                "task already registered: {}",
                descriptor.name
            )));
        }
        debug!(task = descriptor.name, queue = descriptor.queue, "Registered task");
        self.tasks.insert(descriptor.name, task);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(name).cloned()
    }

    pub fn descriptor(&self, name: &str) -> Option<TaskDescriptor> {
        self.tasks.get(name).map(|task| task.descriptor())
    }

    /// Declared queue of a registered task
    pub fn queue_for(&self, name: &str) -> Option<&'static str> {
        self.descriptor(name).map(|d| d.queue)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tasks.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run a task inline on the caller, skipping the queue
    ///
    /// # Errors
    /// - `AppError::NotFound` for an unregistered name
    /// - `AppError::Execution` when the task itself fails
    pub async fn perform_now(&self, name: &str, arguments: &JobArguments) -> Result<()> {
        let task = self
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("task: {name}")))?;
        info!(task = name, arguments = arguments.len(), "Performing task inline");
        task.perform(arguments).await?;
        Ok(())
    }
}
