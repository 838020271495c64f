// Domain Layer - Pure business logic and entities

pub mod error;
pub mod job;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use job::{Job, JobArguments, JobId, JobState, JobType};
pub use queue::{QueueId, DEFAULT_QUEUE};
