// Queue Domain Model

/// Queue identifier
pub type QueueId = String;

/// Queue every task lands on unless it declares otherwise
pub const DEFAULT_QUEUE: &str = "default";

/// Longest accepted queue name
pub const MAX_QUEUE_NAME_LEN: usize = 64;

/// Check a queue name: non-empty, bounded, `[A-Za-z0-9_-]` only
pub fn validate_queue_name(name: &str) -> super::error::Result<()> {
    use super::error::DomainError;

    if name.is_empty() {
        return Err(DomainError::ValidationError(
            "queue name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_QUEUE_NAME_LEN {
        return Err(DomainError::ValidationError(format!(
            "queue name too long ({} > {})",
            name.len(),
            MAX_QUEUE_NAME_LEN
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::ValidationError(format!(
            "queue name must be alphanumeric, '_' or '-': {name}"
        )));
    }
    Ok(())
}
