// Delayed Jobs Core - Domain Logic, Ports & Use Cases
// NO infrastructure dependencies (adapters live in sibling crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
