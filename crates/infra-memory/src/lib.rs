// Delayed Jobs Infrastructure - In-Memory Adapter
// Implements: JobRepository (single process, no persistence)

mod job_repository;

pub use job_repository::InMemoryJobRepository;
