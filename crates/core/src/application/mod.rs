// Application Layer - Use Cases and Business Logic

pub mod delayed_task;
pub mod job_service;
pub mod registry;
pub mod worker;

// Re-exports
pub use delayed_task::{DelayedTask, DELAYED_TASK_DURATION, DELAYED_TASK_MESSAGE};
pub use job_service::{EnqueueRequest, JobService};
pub use registry::TaskRegistry;
pub use worker::{shutdown_channel, ShutdownSender, ShutdownToken, Worker};
