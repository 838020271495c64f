// Time Provider Port (for testability)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Time provider following tokio's clock
///
/// Anchored to the system clock at construction, then advanced by
/// `tokio::time::Instant`, so paused-time tests see job timestamps move
/// with the virtual clock.
pub struct TokioTimeProvider {
    anchor_millis: i64,
    anchor: tokio::time::Instant,
}

impl TokioTimeProvider {
    pub fn new() -> Self {
        Self {
            anchor_millis: chrono::Utc::now().timestamp_millis(),
            anchor: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for TokioTimeProvider {
    fn now_millis(&self) -> i64 {
        self.anchor_millis + self.anchor.elapsed().as_millis() as i64
    }
}
