// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod job_repository;
pub mod task;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use job_repository::JobRepository;
pub use task::{ExecutionError, Task, TaskDescriptor};
pub use time_provider::TimeProvider;
